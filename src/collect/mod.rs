//! Source collection
//!
//! Runs each search result through the gate → fetch → extract →
//! validate sequence and partitions the batch into accepted sources and
//! skipped sources with recorded reasons. One failing result never
//! aborts the batch; every result lands in exactly one partition.

use crate::extract::{self, MIN_CONTENT_CHARS};
use crate::fetch::{self, FetchError};
use crate::gate;
use crate::pipeline::{EventSink, PipelineEvent};
use crate::search::SearchResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Ceiling on stored source content, in characters
pub const MAX_SOURCE_CHARS: usize = 30_000;

/// A validated, extracted unit of text content from one search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Where the content came from
    pub url: Url,

    /// Title from the search result
    pub title: String,

    /// Extracted text, truncated to thirty thousand characters
    pub content: String,
}

/// A search result excluded from synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedSource {
    /// The rejected link
    pub url: Url,

    /// Title from the search result
    pub title: String,

    /// Human-readable classification of the rejection
    pub reason: String,
}

/// Why one search result was rejected
#[derive(Debug, Clone)]
pub enum SkipReason {
    /// The link failed the URL gate
    BlockedDomain,

    /// The fetch failed
    Fetch(FetchError),

    /// Extraction produced too little usable text
    InsufficientContent,

    /// An unexpected error while handling this result
    Processing(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BlockedDomain => write!(f, "Blocked domain"),
            SkipReason::Fetch(e) => write!(f, "Fetch error: {}", e),
            SkipReason::InsufficientContent => write!(f, "Insufficient content extracted"),
            SkipReason::Processing(message) => write!(f, "Processing error: {}", message),
        }
    }
}

/// Partition search results into accepted and skipped sources.
///
/// Results are processed sequentially in input order; the two returned
/// lists together account for every input result exactly once.
#[instrument(skip_all, fields(results = results.len()))]
pub async fn collect_sources(
    client: &reqwest::Client,
    results: &[SearchResult],
    fetch_timeout: Duration,
    sink: &dyn EventSink,
) -> (Vec<Source>, Vec<SkippedSource>) {
    let mut sources = Vec::new();
    let mut skipped = Vec::new();

    for (index, result) in results.iter().enumerate() {
        sink.emit(PipelineEvent::SourceProcessing {
            index: index + 1,
            total: results.len(),
            title: result.title.clone(),
        });

        // Each result runs in its own task so a panic anywhere in the
        // fetch/extract path is recorded as a skip instead of taking
        // down the batch.
        let handled = {
            let client = client.clone();
            let result = result.clone();
            tokio::spawn(async move { process_result(&client, &result, fetch_timeout).await })
                .await
        };
        let outcome = match handled {
            Ok(outcome) => outcome,
            Err(e) => Err(SkipReason::Processing(e.to_string())),
        };

        match outcome {
            Ok(source) => {
                debug!(
                    "Extracted {} characters from {}",
                    source.content.chars().count(),
                    source.url
                );
                sink.emit(PipelineEvent::SourceAccepted {
                    url: source.url.to_string(),
                    chars: source.content.chars().count(),
                });
                sources.push(source);
            }
            Err(reason) => {
                warn!("Skipping {}: {}", result.link, reason);
                sink.emit(PipelineEvent::SourceSkipped {
                    url: result.link.to_string(),
                    reason: reason.to_string(),
                });
                skipped.push(SkippedSource {
                    url: result.link.clone(),
                    title: result.title.clone(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    (sources, skipped)
}

async fn process_result(
    client: &reqwest::Client,
    result: &SearchResult,
    fetch_timeout: Duration,
) -> Result<Source, SkipReason> {
    if !gate::is_fetchable(result.link.as_str()) {
        return Err(SkipReason::BlockedDomain);
    }

    let fetched = fetch::fetch(client, result.link.as_str(), fetch_timeout)
        .await
        .map_err(SkipReason::Fetch)?;

    let content = if extract::is_pdf_content_type(fetched.content_type.as_deref()) {
        extract::extract_pdf(&fetched.bytes)
    } else {
        extract::extract_html(client, &fetched.bytes, result.link.as_str()).await
    };

    let content = truncate_chars(&content, MAX_SOURCE_CHARS);

    if !extract::is_substantive(&content, MIN_CONTENT_CHARS) {
        return Err(SkipReason::InsufficientContent);
    }

    Ok(Source {
        url: result.link.clone(),
        title: result.title.clone(),
        content,
    })
}

/// Truncate text to a character count, on a character boundary.
///
/// Idempotent: re-truncating an already truncated text is a no-op.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::TracingSink;
    use mockito::Server;

    fn result_for(url: &str, title: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            link: url.parse().unwrap(),
            snippet: String::new(),
        }
    }

    fn article_body() -> String {
        let paragraphs =
            "<p>The quick brown fox jumps over the lazy dog near the quiet river bank.</p>"
                .repeat(4);
        format!("<html><body><article>{}</article></body></html>", paragraphs)
    }

    #[tokio::test]
    async fn test_every_result_lands_in_exactly_one_partition() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/article")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(article_body())
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let results = vec![
            result_for("https://youtube.com/watch?v=abc", "A video"),
            result_for(&format!("{}/missing", server.url()), "A dead link"),
            result_for(&format!("{}/article", server.url()), "An article"),
        ];

        let client = reqwest::Client::new();
        let (sources, skipped) =
            collect_sources(&client, &results, Duration::from_secs(5), &TracingSink).await;

        assert_eq!(sources.len() + skipped.len(), results.len());
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "An article");
        assert!(sources[0].content.contains("quick brown fox"));

        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].reason, "Blocked domain");
        assert_eq!(skipped[1].reason, "Fetch error: HTTP error: 404");
    }

    #[tokio::test]
    async fn test_thin_page_skipped_as_insufficient() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/thin")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body><p>hi</p></body></html>")
            .expect_at_least(1)
            .create_async()
            .await;

        let results = vec![result_for(&format!("{}/thin", server.url()), "Thin page")];
        let client = reqwest::Client::new();
        let (sources, skipped) =
            collect_sources(&client, &results, Duration::from_secs(5), &TracingSink).await;

        assert!(sources.is_empty());
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].reason, "Insufficient content extracted");
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let text = "abcdef".repeat(10_000);
        let once = truncate_chars(&text, MAX_SOURCE_CHARS);
        let twice = truncate_chars(&once, MAX_SOURCE_CHARS);

        assert_eq!(once.chars().count(), MAX_SOURCE_CHARS);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "héllo wörld ".repeat(20);
        let truncated = truncate_chars(&text, 25);
        assert_eq!(truncated.chars().count(), 25);
    }

    #[test]
    fn test_skip_reason_strings() {
        assert_eq!(SkipReason::BlockedDomain.to_string(), "Blocked domain");
        assert_eq!(
            SkipReason::Fetch(FetchError::Connection).to_string(),
            "Fetch error: Connection failed"
        );
        assert_eq!(
            SkipReason::InsufficientContent.to_string(),
            "Insufficient content extracted"
        );
        assert_eq!(
            SkipReason::Processing("worker crashed".to_string()).to_string(),
            "Processing error: worker crashed"
        );
    }
}
