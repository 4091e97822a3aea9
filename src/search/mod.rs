//! Web-search boundary
//!
//! Client for a Google-style search API. A query yields an ordered list
//! of organic results truncated to the requested count; the pipeline
//! entry point collapses transport failures to an empty list instead of
//! propagating them.

mod error;

pub use error::SearchError;

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// One organic search hit
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Result title
    pub title: String,

    /// Result link
    pub link: Url,

    /// Result snippet
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    link: Option<String>,
    url: Option<String>,
    displayed_link: Option<String>,
    #[serde(default)]
    snippet: String,
}

/// Client for the search service
#[derive(Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SearchClient {
    /// Create a new search client with the given credential and
    /// per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: "https://serpapi.com".to_string(),
            api_key: api_key.into(),
        })
    }

    /// Set the base URL (for testing only)
    #[cfg(test)]
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }

    /// Run a query and return up to `count` organic results.
    ///
    /// Items without a parseable link are dropped at this boundary.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(
        &self,
        query: &str,
        count: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let num = count.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("engine", "google"),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let mut results = Vec::new();
        for item in parsed.organic_results.into_iter().take(count) {
            let Some(link) = item.link.or(item.url).or(item.displayed_link) else {
                continue;
            };
            match link.parse::<Url>() {
                Ok(link) => results.push(SearchResult {
                    title: item.title,
                    link,
                    snippet: item.snippet,
                }),
                Err(e) => debug!("Dropping result with unparseable link {}: {}", link, e),
            }
        }

        debug!("Search returned {} usable results", results.len());
        Ok(results)
    }

    /// Like [`SearchClient::search`], but transport and API failures
    /// collapse to an empty result list.
    pub async fn results_or_empty(&self, query: &str, count: usize) -> Vec<SearchResult> {
        match self.search(query, count).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Search failed: {}", e);
                Vec::new()
            }
        }
    }
}
