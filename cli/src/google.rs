use std::time::Duration;

use anyhow::Result;
use rocchio::{SearchBackend, SearchRecord};
use serde::Deserialize;

const ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
/// Result page size; the feedback loop judges at most this many documents
/// per round.
const PAGE_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchRecord>,
}

/// Search collaborator backed by the Google Custom Search JSON API.
pub struct GoogleSearch {
    client: reqwest::blocking::Client,
    api_key: String,
    engine_id: String,
}

impl GoogleSearch {
    pub fn new(api_key: String, engine_id: String) -> Result<GoogleSearch> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(12))
            .build()?;
        Ok(GoogleSearch {
            client,
            api_key,
            engine_id,
        })
    }
}

impl SearchBackend for GoogleSearch {
    fn search(&mut self, query: &str) -> Result<Vec<SearchRecord>> {
        let num = PAGE_SIZE.to_string();
        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()?
            .error_for_status()?;
        let mut parsed: SearchResponse = response.json()?;
        parsed.items.truncate(PAGE_SIZE);
        tracing::debug!(results = parsed.items.len(), %query, "search api returned");
        Ok(parsed.items)
    }
}
