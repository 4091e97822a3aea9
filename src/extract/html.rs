//! HTML text extraction
//!
//! The primary strategy scores candidate containers and keeps the one
//! with the densest non-link text, which favors precision over recall.
//! Pages that defeat it get one re-fetch by URL, then a crude
//! whole-document render.

use super::MIN_CONTENT_CHARS;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::io::Cursor;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Class/id fragments that mark boilerplate containers
const BOILERPLATE_MARKERS: &[&str] = &[
    "nav",
    "navbar",
    "menu",
    "sidebar",
    "footer",
    "header",
    "banner",
    "cookie",
    "consent",
    "ads",
    "advert",
    "promo",
    "subscribe",
    "newsletter",
    "comment",
];

/// Render width for the crude text pass
const RENDER_WIDTH: usize = 120;

/// Timeout for the single re-fetch fallback
const REFETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Extract readable text from HTML bytes.
///
/// Strategies, in order: main-content scoring over the supplied bytes;
/// one plain re-fetch of `url` followed by the same scoring pass; a
/// crude render of the whole document with script and style blocks
/// removed. Returns an empty string when every strategy yields fewer
/// than 100 characters. Never fails.
pub async fn extract_html(client: &reqwest::Client, html_bytes: &[u8], url: &str) -> String {
    if html_bytes.is_empty() {
        return String::new();
    }

    let html = String::from_utf8_lossy(html_bytes);
    if let Some(text) = main_content_text(&html) {
        return text;
    }

    if let Some(text) = refetch_and_extract(client, url).await {
        return text;
    }

    let text = crude_text(&html);
    if text.chars().count() >= MIN_CONTENT_CHARS {
        return text;
    }

    debug!("No strategy extracted usable text from {}", url);
    String::new()
}

/// Score article-like containers and return the best one's text, when
/// it clears the minimum content length.
fn main_content_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("article, main, section, div").ok()?;

    let mut best_score: i64 = 0;
    let mut best_text: Option<String> = None;

    for element in document.select(&selector) {
        if is_boilerplate_container(&element) {
            continue;
        }

        let text_chars = element_text_chars(&element);
        if text_chars < 20 {
            continue;
        }

        let link_chars = element_link_text_chars(&element);
        let mut score = text_chars as i64 - 2 * link_chars as i64;
        match element.value().name() {
            "article" => score += 500,
            "main" => score += 300,
            _ => {}
        }
        // Link-heavy blocks are navigation, not prose.
        if link_chars > text_chars / 2 {
            score -= 500;
        }

        if score > best_score {
            best_score = score;
            let text = element.text().collect::<Vec<_>>().join(" ");
            best_text = Some(collapse_whitespace(&text));
        }
    }

    best_text.filter(|t| t.chars().count() >= MIN_CONTENT_CHARS)
}

async fn refetch_and_extract(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = match client.get(url).timeout(REFETCH_TIMEOUT).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!("Re-fetch of {} failed: {}", url, e);
            return None;
        }
    };

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!("Re-fetch of {} failed reading body: {}", url, e);
            return None;
        }
    };

    main_content_text(&body)
}

/// Whole-document render: drop script/style blocks, strip tags and
/// unescape entities through the text renderer, collapse whitespace.
fn crude_text(html: &str) -> String {
    let stripped = script_blocks().replace_all(html, " ");
    let stripped = style_blocks().replace_all(&stripped, " ");

    let rendered =
        html2text::from_read(Cursor::new(stripped.as_bytes()), RENDER_WIDTH).unwrap_or_default();
    collapse_whitespace(&rendered)
}

fn script_blocks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script.*?</script>").unwrap())
}

fn style_blocks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style.*?</style>").unwrap())
}

fn is_boilerplate_container(element: &ElementRef) -> bool {
    let mut attrs = String::new();
    if let Some(class) = element.value().attr("class") {
        attrs.push_str(class);
        attrs.push(' ');
    }
    if let Some(id) = element.value().attr("id") {
        attrs.push_str(id);
    }
    if attrs.is_empty() {
        return false;
    }

    let attrs = attrs.to_lowercase();
    BOILERPLATE_MARKERS.iter().any(|marker| attrs.contains(marker))
}

fn element_text_chars(element: &ElementRef) -> usize {
    element.text().map(|t| t.chars().count()).sum()
}

fn element_link_text_chars(element: &ElementRef) -> usize {
    let Ok(selector) = Selector::parse("a") else {
        return 0;
    };
    element
        .select(&selector)
        .map(|a| a.text().map(|t| t.chars().count()).sum::<usize>())
        .sum()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn article_page(body: &str) -> String {
        format!(
            "<html><body>\
             <nav class=\"nav\"><a href=\"/a\">Home</a><a href=\"/b\">About</a></nav>\
             <article>{}</article>\
             <footer class=\"footer\"><a href=\"/p\">Privacy</a></footer>\
             </body></html>",
            body
        )
    }

    fn long_paragraphs() -> String {
        "<p>The quick brown fox jumps over the lazy dog near the quiet river bank. </p>"
            .repeat(4)
    }

    #[test]
    fn test_main_content_prefers_article_over_navigation() {
        let html = article_page(&long_paragraphs());
        let text = main_content_text(&html).unwrap();

        assert!(text.contains("quick brown fox"));
        assert!(!text.contains("Privacy"));
        assert!(!text.contains("About"));
    }

    #[test]
    fn test_main_content_includes_table_text() {
        let html = article_page(&format!(
            "{}<table><tr><td>cell alpha</td><td>cell beta</td></tr></table>",
            long_paragraphs()
        ));
        let text = main_content_text(&html).unwrap();

        assert!(text.contains("cell alpha"));
        assert!(text.contains("cell beta"));
    }

    #[test]
    fn test_main_content_excludes_comments() {
        let html = article_page(&format!(
            "{}<!-- hidden editorial note -->",
            long_paragraphs()
        ));
        let text = main_content_text(&html).unwrap();

        assert!(!text.contains("hidden editorial note"));
    }

    #[test]
    fn test_short_content_yields_none() {
        let html = article_page("<p>Too short.</p>");
        assert!(main_content_text(&html).is_none());
    }

    #[test]
    fn test_crude_text_strips_scripts_and_unescapes() {
        let html = "<html><body><script>var x = 1;</script>\
                    <style>body { color: red; }</style>\
                    <p>Fish &amp; chips for everyone</p></body></html>";
        let text = crude_text(html);

        assert!(text.contains("Fish & chips"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("color: red"));
    }

    #[tokio::test]
    async fn test_refetch_fallback_used_when_bytes_are_empty_shells() {
        let mut server = Server::new_async().await;
        let full_page = article_page(&long_paragraphs());
        let mock = server
            .mock("GET", "/article")
            .with_status(200)
            .with_body(full_page)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let shell = b"<html><body><div id=\"app\"></div></body></html>";
        let url = format!("{}/article", server.url());
        let text = extract_html(&client, shell, &url).await;

        assert!(text.contains("quick brown fox"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_everything_failing_yields_empty_string() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/empty")
            .with_status(200)
            .with_body("<html><body></body></html>")
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/empty", server.url());
        let text = extract_html(&client, b"<html><body></body></html>", &url).await;

        assert_eq!(text, "");
        mock.assert_async().await;
    }
}
