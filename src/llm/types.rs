//! Type definitions for the language-model API

use serde::{Deserialize, Serialize};

/// A piece of content exchanged with the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The role of the content (e.g. "user", "model")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// The parts that make up this content
    pub parts: Vec<Part>,
}

impl Default for Content {
    fn default() -> Self {
        Self::new()
    }
}

impl Content {
    /// Create a new empty content
    pub fn new() -> Self {
        Self {
            role: None,
            parts: Vec::new(),
        }
    }

    /// Set the role for this content
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Add text to this content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }
}

/// A part of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    /// Text content
    #[serde(rename = "text")]
    Text(String),
}

/// Generation configuration for content generation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    /// Temperature controls randomness in generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Top-p limits sampling to tokens within cumulative probability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Maximum output tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
}

/// Response from content generation
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// The generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts
    pub fn text(&self) -> String {
        let mut text = String::new();
        if let Some(candidate) = self.candidates.first() {
            if let Some(content) = candidate.content.as_ref() {
                for part in &content.parts {
                    let Part::Text(t) = part;
                    text.push_str(t);
                }
            }
        }
        text
    }
}

/// A generated candidate
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// The content of the candidate
    pub content: Option<Content>,

    /// Why generation stopped
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_builder() {
        let content = Content::new().with_role("user").with_text("hello");
        assert_eq!(content.role.as_deref(), Some("user"));
        assert_eq!(content.parts.len(), 1);
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content::new().with_text("a").with_text("b")),
                finish_reason: Some("STOP".to_string()),
            }],
        };
        assert_eq!(response.text(), "ab");
    }

    #[test]
    fn test_response_text_empty_without_candidates() {
        let response = GenerateContentResponse { candidates: vec![] };
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_generation_config_skips_absent_fields() {
        let config = GenerationConfig {
            temperature: Some(0.3),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("temperature"));
        assert!(!json.contains("max_output_tokens"));
    }
}
