//! PDF text extraction
//!
//! Parses at most the first ten pages of a document. A page that fails
//! to extract contributes nothing; the rest of the document survives.

use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Pages parsed per document
const MAX_PAGES: usize = 10;

/// Extract plain text from PDF bytes.
///
/// Returns an empty string for empty input, zero-page documents, and
/// documents the parser cannot read at all. Never fails.
pub fn extract_pdf(pdf_bytes: &[u8]) -> String {
    if pdf_bytes.is_empty() {
        return String::new();
    }

    match parse_pages(pdf_bytes) {
        Ok(pages) => assemble_pages(pages.into_iter().map(Ok)),
        Err(reason) => {
            warn!("PDF parse failed: {}", reason);
            String::new()
        }
    }
}

/// Run the parser over the whole document, catching panics from
/// malformed input.
fn parse_pages(pdf_bytes: &[u8]) -> Result<Vec<String>, String> {
    let owned = pdf_bytes.to_vec();
    match std::panic::catch_unwind(move || pdf_extract::extract_text_from_mem_by_pages(&owned)) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("parser panicked".to_string()),
    }
}

/// Fold per-page extraction results into one normalized text.
///
/// Only the first ten pages are considered. Failed pages are logged and
/// skipped; surviving page texts are joined with a blank line, then
/// whitespace runs are collapsed and stacked blank lines compressed.
fn assemble_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = Result<String, String>>,
{
    let mut parts = Vec::new();

    for (index, page) in pages.into_iter().take(MAX_PAGES).enumerate() {
        match page {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
            Err(reason) => {
                warn!("Skipping page {}: {}", index + 1, reason);
            }
        }
    }

    normalize_whitespace(&parts.join("\n\n"))
}

fn normalize_whitespace(text: &str) -> String {
    static SPACES: OnceLock<Regex> = OnceLock::new();
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();

    let spaces = SPACES.get_or_init(|| Regex::new(r"[ \t]+").unwrap());
    let blank_lines = BLANK_LINES.get_or_init(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());

    let collapsed = spaces.replace_all(text, " ");
    blank_lines
        .replace_all(&collapsed, "\n\n")
        .trim()
        .to_string()
}
