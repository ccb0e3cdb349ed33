use std::collections::{HashMap, HashSet};

use crate::{DocId, TermId};

/// Per-term statistics for one feedback round.
#[derive(Debug, Clone)]
pub struct TermEntry {
    pub term: String,
    /// Set once every document has been counted; see [`FeedbackIndex::build`].
    pub idf: f64,
    /// Rocchio weight. Zero until the scorer assigns it after `build`.
    pub weight: f64,
    /// Occurrence count per relevant document containing the term.
    pub relevant_tf: HashMap<DocId, u32>,
    /// Occurrence count per non-relevant document containing the term.
    pub non_relevant_tf: HashMap<DocId, u32>,
}

impl TermEntry {
    fn new(term: &str) -> TermEntry {
        TermEntry {
            term: term.to_string(),
            idf: 0.0,
            weight: 0.0,
            relevant_tf: HashMap::new(),
            non_relevant_tf: HashMap::new(),
        }
    }

    /// Number of batch documents the term occurs in. At least 1 by
    /// construction: an entry exists only for observed terms.
    pub fn doc_frequency(&self) -> usize {
        self.relevant_tf.len() + self.non_relevant_tf.len()
    }
}

/// Term statistics over the current result batch, split by relevance class.
///
/// Rebuilt from scratch every round; nothing carries over between rounds.
/// Entries are identified by `TermId` in first-occurrence order, which fixes
/// the iteration order used for tie-breaking during selection.
#[derive(Debug, Default)]
pub struct FeedbackIndex {
    dictionary: HashMap<String, TermId>,
    entries: Vec<TermEntry>,
    num_docs: usize,
}

impl FeedbackIndex {
    /// Build the index from per-document term sequences and the set of
    /// documents judged relevant.
    ///
    /// IDF is only computed after the final document has been counted:
    /// `log10(term length) + log10(N / df)`, where N is the batch size and
    /// df the number of documents containing the term. The term-length
    /// component is intentional; do not replace this with a textbook IDF.
    pub fn build(term_sequences: &[Vec<String>], relevant: &HashSet<DocId>) -> FeedbackIndex {
        let mut index = FeedbackIndex {
            num_docs: term_sequences.len(),
            ..FeedbackIndex::default()
        };
        for (doc_id, terms) in term_sequences.iter().enumerate() {
            for term in terms {
                let tid = index.entry_id_or_insert(term);
                let entry = &mut index.entries[tid];
                if relevant.contains(&doc_id) {
                    *entry.relevant_tf.entry(doc_id).or_insert(0) += 1;
                } else {
                    *entry.non_relevant_tf.entry(doc_id).or_insert(0) += 1;
                }
            }
        }
        let num_docs = index.num_docs as f64;
        for entry in &mut index.entries {
            let term_len = entry.term.chars().count() as f64;
            entry.idf = term_len.log10() + (num_docs / entry.doc_frequency() as f64).log10();
        }
        tracing::debug!(
            num_docs = index.num_docs,
            num_terms = index.entries.len(),
            "feedback index built"
        );
        index
    }

    fn entry_id_or_insert(&mut self, term: &str) -> TermId {
        if let Some(&tid) = self.dictionary.get(term) {
            return tid;
        }
        let tid = self.entries.len();
        self.dictionary.insert(term.to_string(), tid);
        self.entries.push(TermEntry::new(term));
        tid
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of documents in the batch the index was built from.
    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn get(&self, term: &str) -> Option<&TermEntry> {
        self.dictionary.get(term).map(|&tid| &self.entries[tid])
    }

    /// Entries in first-occurrence order.
    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [TermEntry] {
        &mut self.entries
    }
}
