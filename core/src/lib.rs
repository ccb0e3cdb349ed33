//! Rocchio-style relevance-feedback query expansion.
//!
//! Given a result batch from a web search and a binary relevance judgment
//! per document, this crate computes an expanded query expected to retrieve
//! a more precise result set on the next round: tokenization of result
//! titles and snippets, a per-round term statistics index split by relevance
//! class, Rocchio TF-IDF term scoring, and the feedback loop controller that
//! repeats search → judge → expand until a precision target is met or no
//! relevant documents remain. Search execution and judgment collection are
//! injected through the [`session::SearchBackend`] and
//! [`session::RelevanceJudge`] traits.

pub mod index;
pub mod record;
pub mod scorer;
pub mod session;
pub mod tokenizer;

/// Position of a result within the current batch, 0-based.
pub type DocId = usize;
/// First-occurrence position of a term within a round's index.
pub type TermId = usize;

pub use index::{FeedbackIndex, TermEntry};
pub use record::SearchRecord;
pub use scorer::Scorer;
pub use session::{Outcome, RelevanceJudge, RoundReport, SearchBackend, Session, SessionConfig};
