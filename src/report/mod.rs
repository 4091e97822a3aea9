//! Report synthesis
//!
//! This module turns accepted sources into a structured report. It
//! builds a budget-bounded prompt, calls the language-model service,
//! and parses the reply, degrading through a line-oriented text parse
//! and finally a deterministic offline fallback. Synthesis never fails:
//! every path resolves to a complete [`Report`].

mod parse;

use crate::collect::{Source, truncate_chars};
use crate::llm::{Content, GenerationConfig, ModelHandle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Ceiling on characters quoted from a single source
const MAX_CHARS_PER_SOURCE: usize = 3_000;

/// Ceiling on total quoted characters across all sources
const MAX_PROMPT_CONTENT_CHARS: usize = 12_000;

/// Output-token bound for the synthesis call
const MAX_OUTPUT_TOKENS: i32 = 1_000;

/// Sampling temperature; low for reproducible reports
const TEMPERATURE: f32 = 0.3;

/// Characters of a source title quoted in a fallback reference note
const MAX_NOTE_CHARS: usize = 60;

const SYSTEM_INSTRUCTION: &str = "You are a concise research assistant. Given a user query and \
     extracted source texts, produce a short structured report: Title, Short summary (2-3 \
     sentences), 4-6 bullet key points, and References (list of URLs with short 6-10 word note). \
     Keep the report factual and cite only the provided sources. Respond in valid JSON format \
     with keys: title, summary, key_points (array), references (array of {url, note}).";

/// A structured research report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report title
    pub title: String,

    /// Short summary
    pub summary: String,

    /// Bullet key points, typically four to six
    pub key_points: Vec<String>,

    /// Cited sources with short notes
    pub references: Vec<Reference>,

    /// Verbatim model reply this report was parsed from
    pub raw_model_response: String,
}

/// One cited source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// Source URL
    pub url: String,

    /// Short note on the source
    pub note: String,
}

/// Characters quoted per source for a given source count.
///
/// Total quoted content stays near twelve thousand characters while no
/// single source exceeds three thousand.
fn per_source_budget(source_count: usize) -> usize {
    MAX_CHARS_PER_SOURCE.min(MAX_PROMPT_CONTENT_CHARS / source_count.max(1))
}

fn build_user_message(sources: &[Source], query: &str) -> String {
    let budget = per_source_budget(sources.len());

    let mut source_texts = String::new();
    for (index, source) in sources.iter().enumerate() {
        let content = truncate_chars(&source.content, budget);
        source_texts.push_str(&format!(
            "\n\n--- SOURCE {}: {} ({}) ---\n{}",
            index + 1,
            source.title,
            source.url,
            content
        ));
    }

    format!(
        "Query: {}\n\nSources:{}\n\nProvide a structured JSON report:",
        query, source_texts
    )
}

/// Produce a structured report for the query from the accepted sources.
///
/// Model unavailability, call failures, and malformed replies all
/// degrade to a usable report; this function never fails.
#[instrument(skip(handle, sources), fields(sources = sources.len()))]
pub async fn synthesize(
    handle: &ModelHandle,
    sources: &[Source],
    query: &str,
    model: &str,
) -> Report {
    let client = match handle {
        ModelHandle::Ready(client) => client,
        ModelHandle::NoCredential => {
            info!("No model credential configured; producing fallback report");
            return fallback_report(sources, query);
        }
        ModelHandle::Failed(reason) => {
            warn!("Model client unavailable ({}); producing fallback report", reason);
            return fallback_report(sources, query);
        }
    };

    let system = Content::new().with_text(SYSTEM_INSTRUCTION);
    let user = Content::new()
        .with_role("user")
        .with_text(build_user_message(sources, query));
    let config = GenerationConfig {
        temperature: Some(TEMPERATURE),
        max_output_tokens: Some(MAX_OUTPUT_TOKENS),
        ..Default::default()
    };

    match client
        .generate_content(model, Some(system), vec![user], Some(config))
        .await
    {
        Ok(response) => {
            let raw = response.text().trim().to_string();
            debug!("Model replied with {} characters", raw.chars().count());
            parse::parse_model_reply(&raw, query)
        }
        Err(e) => {
            warn!("Model call failed: {}", e);
            fallback_report(sources, query)
        }
    }
}

/// Deterministic report produced without model assistance.
///
/// Carries one reference per source and up to five generic key points,
/// so the report shape stays complete on the offline path.
pub fn fallback_report(sources: &[Source], query: &str) -> Report {
    let mut key_points = vec![
        format!("Successfully searched for: {}", query),
        format!("Retrieved {} relevant sources", sources.len()),
        "Content extracted from web pages".to_string(),
        if sources.len() > 1 {
            "Sources include academic and news articles".to_string()
        } else {
            "Single source analyzed".to_string()
        },
        "Data compiled from recent web content".to_string(),
    ];
    key_points.truncate(5);

    Report {
        title: format!("Research Report: {}", query),
        summary: format!(
            "Found {} sources related to '{}'. This report was generated using content \
             extraction and analysis of web sources.",
            sources.len(),
            query
        ),
        key_points,
        references: sources
            .iter()
            .map(|source| Reference {
                url: source.url.to_string(),
                note: truncated_note(&source.title),
            })
            .collect(),
        raw_model_response: "Fallback report generated without model assistance".to_string(),
    }
}

fn truncated_note(title: &str) -> String {
    if title.chars().count() > MAX_NOTE_CHARS {
        let cut: String = title.chars().take(MAX_NOTE_CHARS).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}
