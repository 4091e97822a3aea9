//! Single-URL content fetching
//!
//! Retrieves raw bytes for one URL with a browser-like header set,
//! redirect following, TLS verification, a hard size ceiling enforced
//! both from the declared Content-Length and while streaming, and a
//! bounded retry policy for transient transport failures. HTTP status
//! errors are terminal immediately.

mod error;

pub use error::FetchError;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Ceiling on response size, declared or streamed
const MAX_CONTENT_BYTES: u64 = 50 * 1024 * 1024;

/// Attempts made for timeouts and connection failures
const MAX_ATTEMPTS: u32 = 3;

/// Pause between attempts
const RETRY_PAUSE: Duration = Duration::from_secs(1);

/// Raw bytes returned for a URL
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Response body, at most 50 MiB long
    pub bytes: Vec<u8>,

    /// Lowercased Content-Type header, when the server sent one
    pub content_type: Option<String>,
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,application/pdf,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

/// Build the HTTP client used for page fetching.
///
/// Redirects are followed and certificates verified; per-request
/// timeouts are supplied at call time.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder()
        .default_headers(browser_headers())
        .user_agent(format!(
            "Mozilla/5.0 (compatible; dossier/{}; +https://example.com/bot)",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
}

/// Fetch a URL, returning its bytes and declared content type.
///
/// Timeouts and connection failures are retried up to two more times
/// with a fixed one-second pause. Status errors and oversized bodies
/// fail immediately.
#[instrument(skip(client), level = "debug")]
pub async fn fetch(client: &Client, url: &str, timeout: Duration) -> Result<Fetched, FetchError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(FetchError::InvalidUrl);
    }

    let mut attempt = 1;
    loop {
        match fetch_once(client, url, timeout).await {
            Ok(fetched) => return Ok(fetched),
            Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                warn!("Attempt {} for {} failed: {}", attempt, url, e);
                attempt += 1;
                sleep(RETRY_PAUSE).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn fetch_once(client: &Client, url: &str, timeout: Duration) -> Result<Fetched, FetchError> {
    let mut response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_transport(e, timeout))?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_lowercase());

    if exceeds_ceiling(response.content_length()) {
        return Err(FetchError::DeclaredTooLarge);
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| classify_transport(e, timeout))?
    {
        bytes.extend_from_slice(&chunk);
        if bytes.len() as u64 > MAX_CONTENT_BYTES {
            return Err(FetchError::StreamedTooLarge);
        }
    }

    debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(Fetched {
        bytes,
        content_type,
    })
}

fn exceeds_ceiling(declared: Option<u64>) -> bool {
    declared.is_some_and(|len| len > MAX_CONTENT_BYTES)
}

fn classify_transport(err: reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            timeout_secs: timeout.as_secs(),
            attempts: MAX_ATTEMPTS,
        }
    } else if err.is_connect() {
        FetchError::Connection
    } else {
        FetchError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_success_returns_bytes_and_content_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "Text/HTML; charset=UTF-8")
            .with_body("<html><body>hello</body></html>")
            .create_async()
            .await;

        let client = http_client().unwrap();
        let url = format!("{}/page", server.url());
        let fetched = fetch(&client, &url, Duration::from_secs(5)).await.unwrap();

        assert_eq!(fetched.bytes, b"<html><body>hello</body></html>");
        assert_eq!(
            fetched.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_error_fails_without_retry() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let client = http_client().unwrap();
        let url = format!("{}/missing", server.url());
        let err = fetch(&client, &url, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status(404)));
        assert_eq!(err.to_string(), "HTTP error: 404");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_http_scheme_rejected_without_network() {
        let client = http_client().unwrap();

        let err = fetch(&client, "ftp://example.com/file", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl));

        let err = fetch(&client, "", Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL format");
    }

    #[tokio::test]
    async fn test_connection_failure_retries_then_fails() {
        let client = http_client().unwrap();

        // Port 1 is never listening; every attempt fails at connect.
        let err = fetch(&client, "http://127.0.0.1:1/", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Connection));
        assert_eq!(err.to_string(), "Connection failed");
    }

    #[tokio::test]
    async fn test_timeout_retries_then_reports_attempt_count() {
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and hold them open without ever answering.
        tokio::spawn(async move {
            let mut sockets = Vec::new();
            loop {
                if let Ok((socket, _)) = listener.accept().await {
                    sockets.push(socket);
                }
            }
        });

        let client = http_client().unwrap();
        let url = format!("http://{}/slow", addr);
        let err = fetch(&client, &url, Duration::from_millis(300))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Timeout { .. }));
        assert!(err.to_string().contains("(tried 3 times)"));
    }

    #[test]
    fn test_size_ceiling() {
        assert!(!exceeds_ceiling(None));
        assert!(!exceeds_ceiling(Some(MAX_CONTENT_BYTES)));
        assert!(exceeds_ceiling(Some(MAX_CONTENT_BYTES + 1)));
    }

    #[test]
    fn test_timeout_message_names_attempts() {
        let err = FetchError::Timeout {
            timeout_secs: 30,
            attempts: 3,
        };
        assert_eq!(err.to_string(), "Timeout after 30s (tried 3 times)");
    }
}
