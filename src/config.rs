//! Runtime configuration for the pipeline
//!
//! All credentials and tunables live in one structure that is read from
//! the environment once at startup, validated, and passed down. No other
//! module touches the environment.

use crate::error::{Error, Result};
use std::time::Duration;

/// Environment variable holding the search-provider credential
pub const SEARCH_API_KEY_VAR: &str = "SERPAPI_API_KEY";

/// Environment variable holding the language-model credential
pub const MODEL_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the search service (required)
    pub search_api_key: String,

    /// Credential for the language-model service; absent means every
    /// report uses the offline fallback path
    pub model_api_key: Option<String>,

    /// Model used for report synthesis
    pub model: String,

    /// Number of search results requested per query
    pub result_count: usize,

    /// Timeout for search requests
    pub search_timeout: Duration,

    /// Timeout for page fetches
    pub fetch_timeout: Duration,
}

impl Config {
    /// Build a configuration with default tunables around the given
    /// credentials
    pub fn new(search_api_key: impl Into<String>, model_api_key: Option<String>) -> Self {
        Self {
            search_api_key: search_api_key.into(),
            model_api_key: model_api_key.filter(|k| !k.is_empty()),
            model: "gemini-2.0-flash".to_string(),
            result_count: 3,
            search_timeout: Duration::from_secs(20),
            fetch_timeout: Duration::from_secs(30),
        }
    }

    /// Read configuration from the environment.
    ///
    /// The search credential is required; the model credential is
    /// optional and its absence routes synthesis to the fallback path.
    pub fn from_env() -> Result<Self> {
        let search_api_key = std::env::var(SEARCH_API_KEY_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config(format!("{} is not set", SEARCH_API_KEY_VAR)))?;

        let model_api_key = std::env::var(MODEL_API_KEY_VAR).ok();

        Ok(Self::new(search_api_key, model_api_key))
    }
}
