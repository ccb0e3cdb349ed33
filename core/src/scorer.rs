use std::cmp::Ordering;
use std::collections::HashSet;

use crate::index::FeedbackIndex;
use crate::tokenizer;
use crate::{DocId, TermId};

pub const DEFAULT_BETA: f64 = 0.75;
pub const DEFAULT_GAMMA: f64 = 0.75;

/// Number of new terms appended to the query per round.
const TERMS_PER_ROUND: usize = 2;

/// Rocchio relevance-feedback scorer: weights terms toward relevant
/// documents and away from non-relevant ones, then selects new query terms
/// from the ranking.
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    pub beta: f64,
    pub gamma: f64,
}

impl Default for Scorer {
    fn default() -> Self {
        Scorer {
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl Scorer {
    pub fn new(beta: f64, gamma: f64) -> Scorer {
        Scorer { beta, gamma }
    }

    /// Assign Rocchio weights to every index entry, rank by weight, and
    /// append up to two new terms to the query. Returns the full updated
    /// query term sequence.
    ///
    /// Selection runs in two passes: first only terms occurring in at least
    /// `min(2, |relevant|)` relevant documents qualify; if that yields fewer
    /// than two terms, a relaxed pass takes any term not yet used. Both
    /// passes skip terms whose lowercase or stemmed form collides with a
    /// term already in the query.
    pub fn score_and_select(
        &self,
        index: &mut FeedbackIndex,
        query: &[String],
        relevant: &HashSet<DocId>,
    ) -> Vec<String> {
        self.assign_weights(index);
        let ranked = rank_by_weight(index);
        let excluded = exclusion_set(query);
        // A primary pick must show up in at least this many relevant
        // documents, capped by how many relevant documents there are.
        let needed_docs = relevant.len().min(2);

        let mut selected: Vec<String> = Vec::new();
        for &tid in &ranked {
            if selected.len() == TERMS_PER_ROUND {
                break;
            }
            let entry = &index.entries()[tid];
            if is_excluded(&entry.term, &excluded) || entry.relevant_tf.len() < needed_docs {
                continue;
            }
            selected.push(entry.term.clone());
        }
        if selected.len() < TERMS_PER_ROUND {
            // Relaxed pass: drop the relevant-document-count requirement so
            // the search still moves along.
            for &tid in &ranked {
                if selected.len() == TERMS_PER_ROUND {
                    break;
                }
                let entry = &index.entries()[tid];
                if is_excluded(&entry.term, &excluded) || selected.contains(&entry.term) {
                    continue;
                }
                selected.push(entry.term.clone());
            }
        }
        tracing::debug!(terms = ?selected, "expansion terms selected");

        let mut updated = query.to_vec();
        updated.extend(selected);
        updated
    }

    fn assign_weights(&self, index: &mut FeedbackIndex) {
        for entry in index.entries_mut() {
            let mut weight = 0.0;
            if !entry.relevant_tf.is_empty() {
                let share = self.beta / entry.relevant_tf.len() as f64;
                for &tf in entry.relevant_tf.values() {
                    weight += share * (1.0 + f64::from(tf).log10()) * entry.idf;
                }
            }
            if !entry.non_relevant_tf.is_empty() {
                let share = self.gamma / entry.non_relevant_tf.len() as f64;
                for &tf in entry.non_relevant_tf.values() {
                    weight -= share * (1.0 + f64::from(tf).log10()) * entry.idf;
                }
            }
            entry.weight = weight;
        }
    }
}

/// Term ids sorted by weight descending. The sort is stable, so equal
/// weights keep first-occurrence order.
fn rank_by_weight(index: &FeedbackIndex) -> Vec<TermId> {
    let mut ranked: Vec<TermId> = (0..index.len()).collect();
    ranked.sort_by(|&a, &b| {
        let wa = index.entries()[a].weight;
        let wb = index.entries()[b].weight;
        wb.partial_cmp(&wa).unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Lowercased and stemmed forms of every term already in the query.
fn exclusion_set(query: &[String]) -> HashSet<String> {
    let mut excluded = HashSet::new();
    for term in query {
        let lower = term.to_lowercase();
        excluded.insert(tokenizer::stem(&lower));
        excluded.insert(lower);
    }
    excluded
}

fn is_excluded(term: &str, excluded: &HashSet<String>) -> bool {
    excluded.contains(term) || excluded.contains(tokenizer::stem(term).as_str())
}
