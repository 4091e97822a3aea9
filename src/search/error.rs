//! Error types for the search module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Search API returned an error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Response parsing error: {0}")]
    Parse(String),
}

impl From<SearchError> for CrateError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Http(e) => CrateError::Http(e),
            _ => CrateError::Search(err.to_string()),
        }
    }
}
