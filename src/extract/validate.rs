//! Extracted-content validation

use regex::Regex;
use std::sync::OnceLock;

/// Phrases that mark error and interstitial pages
const ERROR_PAGE_PHRASES: &[&str] = &[
    "page not found",
    "404",
    "403 forbidden",
    "access denied",
    "javascript is disabled",
    "enable javascript",
    "captcha",
    "blocked",
    "bot detection",
];

/// Minimum number of word tokens for text to count as prose
const MIN_WORDS: usize = 20;

fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").unwrap())
}

/// Judge whether extracted text is substantive enough to keep.
///
/// Rejects text shorter than `min_length` characters after trimming,
/// text with fewer than twenty word tokens, and text containing any
/// known error-page phrase. This is a heuristic gate, not a classifier;
/// legitimate short pages fail it.
pub fn is_substantive(content: &str, min_length: usize) -> bool {
    let content = content.trim();
    if content.is_empty() || content.chars().count() < min_length {
        return false;
    }

    if word_pattern().find_iter(content).count() < MIN_WORDS {
        return false;
    }

    let lowered = content.to_lowercase();
    !ERROR_PAGE_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}
