//! Model-reply parsing
//!
//! JSON replies carrying all four required fields are taken as-is.
//! Everything else goes through a line-oriented parse that recognizes
//! section headers and bullet lines, substituting placeholder values
//! for whatever it cannot recover.

use super::{Reference, Report};
use serde::Deserialize;
use tracing::debug;

/// Shape a JSON reply must fill completely to be accepted
#[derive(Debug, Deserialize)]
struct RawReport {
    title: Option<String>,
    summary: Option<String>,
    key_points: Option<Vec<String>>,
    references: Option<Vec<RawReference>>,
}

#[derive(Debug, Deserialize)]
struct RawReference {
    #[serde(default)]
    url: String,
    #[serde(default)]
    note: String,
}

enum Section {
    None,
    Summary,
    KeyPoints,
    References,
}

/// Parse a model reply into a report.
pub(crate) fn parse_model_reply(raw: &str, query: &str) -> Report {
    if let Ok(parsed) = serde_json::from_str::<RawReport>(raw) {
        match (
            parsed.title,
            parsed.summary,
            parsed.key_points,
            parsed.references,
        ) {
            (Some(title), Some(summary), Some(key_points), Some(references)) => {
                return Report {
                    title,
                    summary,
                    key_points,
                    references: references
                        .into_iter()
                        .map(|r| Reference {
                            url: r.url,
                            note: r.note,
                        })
                        .collect(),
                    raw_model_response: raw.to_string(),
                };
            }
            _ => debug!("JSON reply missing required fields; using text parse"),
        }
    }

    parse_text_reply(raw, query)
}

/// Line-oriented parse for replies that are not complete JSON.
fn parse_text_reply(raw: &str, query: &str) -> Report {
    let mut title = String::new();
    let mut summary = String::new();
    let mut key_points: Vec<String> = Vec::new();
    let mut references: Vec<Reference> = Vec::new();
    let mut section = Section::None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if contains_ignore_case(line, "title:") || line.starts_with('#') {
            title = strip_label(line.trim_start_matches('#').trim(), "title:");
        } else if contains_ignore_case(line, "summary:") {
            section = Section::Summary;
            summary = strip_label(line, "summary:");
        } else if contains_ignore_case(line, "key points:")
            || contains_ignore_case(line, "key_points:")
        {
            section = Section::KeyPoints;
        } else if contains_ignore_case(line, "references:") {
            section = Section::References;
        } else if matches!(section, Section::Summary) && !summary.is_empty() {
            summary.push(' ');
            summary.push_str(line);
        } else if matches!(section, Section::KeyPoints) && is_bullet(line) {
            key_points.push(strip_bullet(line));
        } else if matches!(section, Section::References) && is_bullet(line) {
            references.push(Reference {
                url: "N/A".to_string(),
                note: strip_bullet(line),
            });
        }
    }

    Report {
        title: if title.is_empty() {
            format!("Research Report: {}", query)
        } else {
            title
        },
        summary: if summary.is_empty() {
            "Summary not available from parsed response".to_string()
        } else {
            summary
        },
        key_points: if key_points.is_empty() {
            vec!["No key points extracted from response".to_string()]
        } else {
            key_points
        },
        references,
        raw_model_response: raw.to_string(),
    }
}

/// ASCII-case-insensitive substring search; safe to slice at the
/// returned byte offset since the needle is ASCII.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let ned = needle.as_bytes();
    if ned.is_empty() || hay.len() < ned.len() {
        return None;
    }
    (0..=hay.len() - ned.len()).find(|&i| hay[i..i + ned.len()].eq_ignore_ascii_case(ned))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle).is_some()
}

/// Drop a `label:` prefix, keeping whatever follows it.
fn strip_label(line: &str, label: &str) -> String {
    match find_ignore_case(line, label) {
        Some(pos) => line[pos + label.len()..].trim().to_string(),
        None => line.trim().to_string(),
    }
}

fn is_bullet(line: &str) -> bool {
    line.starts_with('-') || line.starts_with('•')
}

fn strip_bullet(line: &str) -> String {
    line.trim_start_matches(['-', '•', ' ']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_json_reply_accepted() {
        let raw = r#"{
            "title": "Report title",
            "summary": "A summary.",
            "key_points": ["one", "two"],
            "references": [{"url": "https://example.com", "note": "the source"}]
        }"#;
        let report = parse_model_reply(raw, "query");

        assert_eq!(report.title, "Report title");
        assert_eq!(report.summary, "A summary.");
        assert_eq!(report.key_points, vec!["one", "two"]);
        assert_eq!(report.references.len(), 1);
        assert_eq!(report.raw_model_response, raw);
    }

    #[test]
    fn test_incomplete_json_falls_through_to_text_parse() {
        // Valid JSON, but no references field.
        let raw = r#"{"title": "T", "summary": "S", "key_points": ["k"]}"#;
        let report = parse_model_reply(raw, "query");

        assert_eq!(report.summary, "Summary not available from parsed response");
        assert_eq!(
            report.key_points,
            vec!["No key points extracted from response"]
        );
    }

    #[test]
    fn test_text_reply_sections_parsed() {
        let raw = "Title: Solar sail progress\n\
                   Summary: Missions advanced this year.\n\
                   Further tests are planned.\n\
                   Key points:\n\
                   - First flight completed\n\
                   • Funding secured\n\
                   References:\n\
                   - NASA mission page\n";
        let report = parse_model_reply(raw, "query");

        assert_eq!(report.title, "Solar sail progress");
        assert_eq!(
            report.summary,
            "Missions advanced this year. Further tests are planned."
        );
        assert_eq!(
            report.key_points,
            vec!["First flight completed", "Funding secured"]
        );
        assert_eq!(report.references.len(), 1);
        assert_eq!(report.references[0].url, "N/A");
        assert_eq!(report.references[0].note, "NASA mission page");
    }

    #[test]
    fn test_section_headers_are_case_insensitive() {
        let raw = "TITLE: Loud title\nSUMMARY: Loud summary.\nKEY POINTS:\n- point\n";
        let report = parse_model_reply(raw, "query");

        assert_eq!(report.title, "Loud title");
        assert_eq!(report.summary, "Loud summary.");
        assert_eq!(report.key_points, vec!["point"]);
    }

    #[test]
    fn test_markdown_heading_taken_as_title() {
        let raw = "# A heading\nSummary: text here.\n";
        let report = parse_model_reply(raw, "query");
        assert_eq!(report.title, "A heading");
    }

    #[test]
    fn test_empty_reply_gets_placeholders() {
        let report = parse_model_reply("", "rust gc");

        assert_eq!(report.title, "Research Report: rust gc");
        assert_eq!(report.summary, "Summary not available from parsed response");
        assert_eq!(
            report.key_points,
            vec!["No key points extracted from response"]
        );
        assert!(report.references.is_empty());
        assert_eq!(report.raw_model_response, "");
    }

    #[test]
    fn test_non_bullet_lines_outside_sections_ignored() {
        let raw = "random preamble\nKey points:\nnot a bullet\n- actual point\n";
        let report = parse_model_reply(raw, "q");
        assert_eq!(report.key_points, vec!["actual point"]);
    }
}
