use std::collections::HashSet;

use anyhow::Result;
use rocchio::{
    tokenizer, DocId, Outcome, RelevanceJudge, RoundReport, SearchBackend, SearchRecord, Session,
    SessionConfig,
};

fn html(link: &str, title: &str, snippet: &str) -> SearchRecord {
    SearchRecord {
        link: link.into(),
        title: Some(title.into()),
        snippet: Some(snippet.into()),
        file_format: None,
    }
}

fn pdf(link: &str) -> SearchRecord {
    SearchRecord {
        link: link.into(),
        title: Some("Scanned report".into()),
        snippet: None,
        file_format: Some("PDF/Adobe Acrobat".into()),
    }
}

/// Serves one scripted batch per round and records every issued query.
struct ScriptedSearch {
    batches: Vec<Vec<SearchRecord>>,
    issued: Vec<String>,
}

impl ScriptedSearch {
    fn new(batches: Vec<Vec<SearchRecord>>) -> Self {
        Self {
            batches,
            issued: Vec::new(),
        }
    }
}

impl SearchBackend for ScriptedSearch {
    fn search(&mut self, query: &str) -> Result<Vec<SearchRecord>> {
        self.issued.push(query.to_string());
        if self.batches.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(self.batches.remove(0))
        }
    }
}

/// Marks relevant any record whose link is in the set; counts invocations so
/// tests can assert which records were actually judged.
struct LinkJudge {
    relevant: HashSet<String>,
    calls: usize,
}

impl LinkJudge {
    fn new(links: &[&str]) -> Self {
        Self {
            relevant: links.iter().map(|l| l.to_string()).collect(),
            calls: 0,
        }
    }
}

impl RelevanceJudge for LinkJudge {
    fn judge(&mut self, _doc_id: DocId, record: &SearchRecord) -> Result<bool> {
        self.calls += 1;
        Ok(self.relevant.contains(&record.link))
    }
}

fn config(target: f64) -> SessionConfig {
    SessionConfig {
        target_precision: target,
        ..SessionConfig::default()
    }
}

#[test]
fn below_target_precision_expands_the_query() {
    // 10 documents, 3 relevant, target 0.5: precision 0.3, loop continues.
    let batch: Vec<SearchRecord> = (0..10)
        .map(|i| {
            html(
                &format!("https://example.com/{i}"),
                &format!("Jaguar page number{i}"),
                "panthera onca habitat rainforest",
            )
        })
        .collect();
    let mut search = ScriptedSearch::new(vec![batch]);
    let mut judge = LinkJudge::new(&[
        "https://example.com/0",
        "https://example.com/1",
        "https://example.com/2",
    ]);

    let mut session = Session::new("jaguar", config(0.5));
    let report = session.run_round(&mut search, &mut judge).unwrap();

    assert_eq!(report.valid, 10);
    assert_eq!(report.relevant, 3);
    assert!((report.precision - 0.3).abs() < 1e-12);
    assert!(matches!(report.outcome, Outcome::Expanded { .. }));
    assert!(session.query_terms().len() > 1);
}

#[test]
fn all_non_consumable_results_stop_with_zero_precision() {
    let batch = vec![pdf("https://example.com/a.pdf"), pdf("https://example.com/b.pdf")];
    let mut search = ScriptedSearch::new(vec![batch]);
    let mut judge = LinkJudge::new(&["https://example.com/a.pdf"]);

    let mut session = Session::new("jaguar", config(0.5));
    let report = session.run_round(&mut search, &mut judge).unwrap();

    assert_eq!(report.valid, 0);
    assert_eq!(report.precision, 0.0);
    assert_eq!(report.outcome, Outcome::DeadEnd);
    // Nothing was consumable, so nothing was judged.
    assert_eq!(judge.calls, 0);
}

#[test]
fn empty_batch_stops_with_zero_precision() {
    let mut search = ScriptedSearch::new(vec![Vec::new()]);
    let mut judge = LinkJudge::new(&[]);

    let mut session = Session::new("jaguar", config(0.5));
    let report = session.run_round(&mut search, &mut judge).unwrap();

    assert_eq!(report.valid, 0);
    assert_eq!(report.outcome, Outcome::DeadEnd);
}

#[test]
fn no_relevant_documents_is_a_dead_end() {
    let batch = vec![
        html("https://example.com/1", "Used car listings", "jaguar dealership offers"),
        html("https://example.com/2", "Car forum", "jaguar maintenance thread"),
    ];
    let mut search = ScriptedSearch::new(vec![batch]);
    let mut judge = LinkJudge::new(&[]);

    let mut session = Session::new("jaguar", config(0.5));
    let report = session.run_round(&mut search, &mut judge).unwrap();

    assert_eq!(report.precision, 0.0);
    assert_eq!(report.outcome, Outcome::DeadEnd);
    // The query is left untouched for the user to replace.
    assert_eq!(session.query_string(), "jaguar");
}

#[test]
fn target_reached_stops_the_session() {
    let batch = vec![
        html("https://example.com/1", "Panthera onca", "the jaguar is a large cat"),
        html("https://example.com/2", "Jaguar habitat", "rainforest range of panthera onca"),
    ];
    let mut search = ScriptedSearch::new(vec![batch]);
    let mut judge = LinkJudge::new(&["https://example.com/1", "https://example.com/2"]);

    let mut session = Session::new("jaguar", config(0.5));
    let report = session.run(&mut search, &mut judge).unwrap();

    assert_eq!(report.precision, 1.0);
    assert_eq!(report.outcome, Outcome::TargetReached);
    assert_eq!(search.issued, vec!["jaguar".to_string()]);
}

#[test]
fn non_consumable_results_are_skipped_but_batch_positions_hold() {
    // The pdf occupies position 0; the consumable records keep their batch
    // positions 1 and 2 for judgment and expansion.
    let batch = vec![
        pdf("https://example.com/spec.pdf"),
        html("https://example.com/1", "Panthera onca", "jaguar species profile"),
        html("https://example.com/2", "Jaguar cars", "dealership listings"),
    ];
    let mut search = ScriptedSearch::new(vec![batch]);
    let mut judge = LinkJudge::new(&["https://example.com/1"]);

    let mut session = Session::new("jaguar", config(0.9));
    let report = session.run_round(&mut search, &mut judge).unwrap();

    assert_eq!(report.valid, 2);
    assert_eq!(report.relevant, 1);
    assert_eq!(judge.calls, 2);
    assert!((report.precision - 0.5).abs() < 1e-12);
    assert!(matches!(report.outcome, Outcome::Expanded { .. }));
}

#[test]
fn query_only_grows_and_never_repeats_a_normalized_term() {
    let round1 = vec![
        html("https://example.com/1", "Panthera onca", "jaguar rainforest predator"),
        html("https://example.com/2", "Jaguar cars", "dealership listings prices"),
    ];
    let round2 = vec![
        html("https://example.com/3", "Panthera research", "rainforest predator ecology"),
        html("https://example.com/4", "Jaguar speed", "fastest big cat sprint"),
    ];
    let round3 = vec![html(
        "https://example.com/5",
        "Panthera onca profile",
        "habitat and diet",
    )];
    let mut search = ScriptedSearch::new(vec![round1, round2, round3]);
    // Round 3's single relevant document pushes precision to 1.0.
    let mut judge = LinkJudge::new(&[
        "https://example.com/1",
        "https://example.com/3",
        "https://example.com/5",
    ]);

    let mut session = Session::new("jaguar", config(0.9));
    let mut reports: Vec<RoundReport> = Vec::new();
    loop {
        let report = session.run_round(&mut search, &mut judge).unwrap();
        let terminal = report.outcome.is_terminal();
        reports.push(report);
        if terminal {
            break;
        }
    }

    assert_eq!(reports.len(), 3);
    assert_eq!(reports.last().unwrap().outcome, Outcome::TargetReached);

    // Monotonic growth, at most two terms per round.
    let mut prev_len = 1;
    for report in &reports {
        let len = report.query.split_whitespace().count();
        assert!(len >= prev_len);
        assert!(len - prev_len <= 2);
        prev_len = len;
    }

    // No lowercase or stemmed form appears twice in the final query.
    let final_terms: Vec<&str> = reports.last().unwrap().query.split_whitespace().collect();
    let lowers: Vec<String> = final_terms.iter().map(|t| t.to_lowercase()).collect();
    let stems: Vec<String> = lowers.iter().map(|t| tokenizer::stem(t)).collect();
    assert_eq!(lowers.iter().collect::<HashSet<_>>().len(), lowers.len());
    assert_eq!(stems.iter().collect::<HashSet<_>>().len(), stems.len());

    // Every issued query extends the previous one.
    for pair in search.issued.windows(2) {
        assert!(pair[1].starts_with(pair[0].as_str()));
    }
}

#[test]
fn round_limit_bounds_the_session() {
    let batch = |i: usize| {
        vec![
            html(
                &format!("https://example.com/r{i}a"),
                "Panthera onca",
                "jaguar rainforest predator",
            ),
            html(
                &format!("https://example.com/r{i}b"),
                "Jaguar cars",
                "dealership listings prices",
            ),
        ]
    };
    let mut search = ScriptedSearch::new(vec![batch(1), batch(2), batch(3)]);
    let mut judge = LinkJudge::new(&[
        "https://example.com/r1a",
        "https://example.com/r2a",
        "https://example.com/r3a",
    ]);

    let config = SessionConfig {
        target_precision: 0.9,
        max_rounds: Some(2),
        ..SessionConfig::default()
    };
    let mut session = Session::new("jaguar", config);
    let report = session.run(&mut search, &mut judge).unwrap();

    assert_eq!(report.round, 2);
    assert_eq!(report.outcome, Outcome::RoundLimit);
    assert_eq!(search.issued.len(), 2);
}

#[test]
fn precision_stays_within_unit_interval() {
    let batch = vec![
        html("https://example.com/1", "Panthera onca", "jaguar"),
        pdf("https://example.com/2.pdf"),
    ];
    let mut search = ScriptedSearch::new(vec![batch]);
    let mut judge = LinkJudge::new(&["https://example.com/1"]);

    let mut session = Session::new("jaguar", config(0.9));
    let report = session.run_round(&mut search, &mut judge).unwrap();
    assert!(report.precision >= 0.0 && report.precision <= 1.0);
    assert_eq!(report.outcome, Outcome::TargetReached);
}
