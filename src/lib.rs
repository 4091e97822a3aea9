//! # Dossier - Research-Report Pipeline for Rust
//!
//! This crate turns a natural-language query into a structured,
//! persisted research report: it searches the web, fetches and extracts
//! readable text from the top results, asks a language model to
//! synthesize a report, and stores the result for later retrieval.
//!
//! ## Features
//!
//! - URL gating against social/media domains and binary file types
//! - Bounded fetching with retries, redirects, and a hard size ceiling
//! - Layered HTML extraction and page-bounded PDF extraction
//! - Content validation before a source is accepted
//! - Budget-bounded prompt construction and resilient reply parsing,
//!   with a deterministic offline fallback report
//! - libsql persistence with listing and lookup
//! - Structured progress events and tracing throughout
//!
//! ## Example
//!
//! ```rust,no_run
//! use dossier::config::Config;
//! use dossier::llm::ModelHandle;
//! use dossier::pipeline::Pipeline;
//! use dossier::search::SearchClient;
//! use dossier::store::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let search = SearchClient::new(&config.search_api_key, config.search_timeout)?;
//!     let model = ModelHandle::from_credential(config.model_api_key.as_deref());
//!     let store = Database::new_from_path("reports.db").await?;
//!
//!     let pipeline = Pipeline::new(config, search, model, store)?;
//!     let outcome = pipeline.run("latest developments in solar sails").await;
//!
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```

mod error;

pub mod collect;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod gate;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod search;
pub mod store;

pub use error::Error;

/// Re-export of the crate error types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
