//! Candidate-link filtering
//!
//! A pure predicate that decides whether a search hit is worth fetching.
//! Social/video platforms and binary media links are rejected up front.

/// Domains whose pages never yield usable article text
const BLOCKED_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "linkedin.com",
    "reddit.com",
    "tiktok.com",
];

/// File extensions that mark non-text content
const BLOCKED_EXTENSIONS: &[&str] = &[".mp4", ".mp3", ".jpg", ".png", ".gif", ".zip", ".exe"];

/// Decide whether a candidate link is eligible for fetching.
///
/// Matching is a lowercased substring check on the whole URL. Never
/// fails and performs no I/O.
pub fn is_fetchable(url: &str) -> bool {
    let url = url.to_lowercase();

    if BLOCKED_DOMAINS.iter().any(|domain| url.contains(domain)) {
        return false;
    }

    if BLOCKED_EXTENSIONS.iter().any(|ext| url.contains(ext)) {
        return false;
    }

    true
}
