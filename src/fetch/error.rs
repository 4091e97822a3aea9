//! Error types for the fetch module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for a single-URL fetch
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// URL lacks an http(s) scheme
    #[error("Invalid URL format")]
    InvalidUrl,

    /// Declared Content-Length exceeds the size ceiling
    #[error("Content too large (>50MB)")]
    DeclaredTooLarge,

    /// Streamed body exceeded the size ceiling mid-download
    #[error("Content too large during download")]
    StreamedTooLarge,

    /// Request timed out on every attempt
    #[error("Timeout after {timeout_secs}s (tried {attempts} times)")]
    Timeout {
        /// Per-attempt timeout in seconds
        timeout_secs: u64,
        /// Attempts made before giving up
        attempts: u32,
    },

    /// Connection could not be established on any attempt
    #[error("Connection failed")]
    Connection,

    /// Server answered with an error status
    #[error("HTTP error: {0}")]
    Status(u16),

    /// Any other transport-level failure
    #[error("Request error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Whether another attempt may succeed
    pub(crate) fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Connection)
    }
}

impl From<FetchError> for CrateError {
    fn from(err: FetchError) -> Self {
        CrateError::Fetch(err.to_string())
    }
}
