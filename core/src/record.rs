use serde::{Deserialize, Serialize};

/// One result returned by the search collaborator for the current round.
///
/// Mirrors the wire shape of a web search API item: only `link` is
/// guaranteed; a `fileFormat` marker flags a non-HTML resource that must be
/// excluded from judgment and the valid-document count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    pub link: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
    #[serde(rename = "fileFormat")]
    pub file_format: Option<String>,
}

impl SearchRecord {
    /// A record is consumable when it points at an ordinary HTML page.
    pub fn is_consumable(&self) -> bool {
        self.file_format.is_none()
    }
}
