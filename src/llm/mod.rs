//! Language-model service boundary
//!
//! This module provides the client for the model API: an HTTP layer
//! with status-code mapping, the request/response types for content
//! generation, and the three-state handle injected into the report
//! synthesizer.

mod client;
mod http;
mod types;

pub use client::{Client, ModelHandle};
pub use types::{Candidate, Content, GenerateContentResponse, GenerationConfig, Part};
