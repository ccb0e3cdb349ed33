use std::collections::HashSet;

use anyhow::Result;

use crate::index::FeedbackIndex;
use crate::record::SearchRecord;
use crate::scorer::{Scorer, DEFAULT_BETA, DEFAULT_GAMMA};
use crate::tokenizer;
use crate::DocId;

/// Search collaborator: issues a query and returns the result batch.
pub trait SearchBackend {
    fn search(&mut self, query: &str) -> Result<Vec<SearchRecord>>;
}

/// Judgment collaborator: obtains a binary relevance decision for one
/// consumable result. `doc_id` is the record's position in the batch.
pub trait RelevanceJudge {
    fn judge(&mut self, doc_id: DocId, record: &SearchRecord) -> Result<bool>;
}

/// Knobs consumed by the feedback loop.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Precision at which the session declares success, in (0, 1].
    pub target_precision: f64,
    /// Positive (relevant-document) feedback weight.
    pub beta: f64,
    /// Negative (non-relevant-document) feedback weight.
    pub gamma: f64,
    /// Optional bound on the total number of rounds. `None` leaves the loop
    /// open-ended: the human keeps judging until a stop condition fires.
    pub max_rounds: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            target_precision: 0.9,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
            max_rounds: None,
        }
    }
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Precision reached the target.
    TargetReached,
    /// No relevant documents (or no valid documents at all). Expansion
    /// cannot help; the user needs a fresh query.
    DeadEnd,
    /// Round budget exhausted before reaching the target.
    RoundLimit,
    /// Query expanded with new terms; another round follows.
    Expanded { added: Vec<String> },
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Expanded { .. })
    }
}

/// What one round produced, ready for display by the caller.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: u32,
    /// Consumable documents in the batch.
    pub valid: usize,
    /// Documents the judge marked relevant.
    pub relevant: usize,
    pub precision: f64,
    /// Query in effect after the round (expanded when the outcome is
    /// `Expanded`).
    pub query: String,
    pub outcome: Outcome,
}

/// Feedback loop controller.
///
/// Owns the query for the whole session; the batch, the judgment set, and
/// the index live and die within a single round. Each round issues the
/// query, collects judgments on consumable results, evaluates precision,
/// and either stops or expands the query for the next round.
#[derive(Debug)]
pub struct Session {
    query: Vec<String>,
    config: SessionConfig,
    rounds_run: u32,
}

impl Session {
    pub fn new(initial_query: &str, config: SessionConfig) -> Session {
        Session {
            query: initial_query.split_whitespace().map(str::to_string).collect(),
            config,
            rounds_run: 0,
        }
    }

    /// Current query as sent to the search backend.
    pub fn query_string(&self) -> String {
        self.query.join(" ")
    }

    pub fn query_terms(&self) -> &[String] {
        &self.query
    }

    /// Execute one search → judge → evaluate (→ expand) round.
    pub fn run_round(
        &mut self,
        search: &mut dyn SearchBackend,
        judge: &mut dyn RelevanceJudge,
    ) -> Result<RoundReport> {
        let records = search.search(&self.query_string())?;

        let mut relevant: HashSet<DocId> = HashSet::new();
        let mut valid = 0usize;
        for (doc_id, record) in records.iter().enumerate() {
            if !record.is_consumable() {
                tracing::debug!(doc_id, link = %record.link, "skipping non-html result");
                continue;
            }
            valid += 1;
            if judge.judge(doc_id, record)? {
                relevant.insert(doc_id);
            }
        }

        // With no valid documents precision is undefined; report 0 and stop.
        let precision = if valid == 0 {
            0.0
        } else {
            relevant.len() as f64 / valid as f64
        };
        self.rounds_run += 1;

        let outcome = if precision >= self.config.target_precision {
            Outcome::TargetReached
        } else if precision == 0.0 {
            Outcome::DeadEnd
        } else if self.config.max_rounds.is_some_and(|max| self.rounds_run >= max) {
            Outcome::RoundLimit
        } else {
            let added = self.expand(&records, &relevant);
            Outcome::Expanded { added }
        };

        let report = RoundReport {
            round: self.rounds_run,
            valid,
            relevant: relevant.len(),
            precision,
            query: self.query_string(),
            outcome,
        };
        tracing::info!(
            round = report.round,
            valid = report.valid,
            relevant = report.relevant,
            precision = report.precision,
            query = %report.query,
            "round evaluated"
        );
        Ok(report)
    }

    /// Drive rounds until a terminal outcome; returns the final report.
    pub fn run(
        &mut self,
        search: &mut dyn SearchBackend,
        judge: &mut dyn RelevanceJudge,
    ) -> Result<RoundReport> {
        loop {
            let report = self.run_round(search, judge)?;
            if report.outcome.is_terminal() {
                return Ok(report);
            }
        }
    }

    /// Tokenize the whole batch, rebuild the feedback index, and replace the
    /// query with the scorer's output. Returns the newly appended terms.
    fn expand(&mut self, records: &[SearchRecord], relevant: &HashSet<DocId>) -> Vec<String> {
        let term_sequences: Vec<Vec<String>> =
            records.iter().map(tokenizer::record_terms).collect();
        let mut index = FeedbackIndex::build(&term_sequences, relevant);
        let scorer = Scorer::new(self.config.beta, self.config.gamma);
        let updated = scorer.score_and_select(&mut index, &self.query, relevant);
        let added = updated[self.query.len()..].to_vec();
        self.query = updated;
        added
    }
}
