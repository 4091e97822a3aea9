//! Report persistence
//!
//! libsql-backed store for finished reports. A save serializes the full
//! pipeline record as JSON next to denormalized listing columns and
//! returns the generated identifier; lookups return the record by
//! identifier or a recent-first summary list.

mod database;
mod error;
mod schema;

pub use database::Database;
pub use error::DbError;

use crate::collect::{SkippedSource, Source};
use crate::report::Report;
use serde::{Deserialize, Serialize};

/// The full object persisted for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    /// The query that produced this report
    pub query: String,

    /// Accepted sources
    pub sources: Vec<Source>,

    /// Rejected sources with reasons
    pub skipped_sources: Vec<SkippedSource>,

    /// The synthesized report
    pub report: Report,

    /// Wall-clock seconds the run took
    pub processing_time_seconds: f64,
}

/// A stored report retrieved by identifier
#[derive(Debug, Clone, Serialize)]
pub struct StoredReport {
    /// Generated identifier
    pub id: i64,

    /// The query that produced this report
    pub query: String,

    /// Save time, RFC 3339
    pub created_at: String,

    /// Report title
    pub title: String,

    /// Report summary
    pub summary: String,

    /// The full persisted record
    pub record: ReportRecord,
}

/// One row of the recent-reports listing
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// Generated identifier
    pub id: i64,

    /// The query that produced this report
    pub query: String,

    /// Save time, RFC 3339
    pub created_at: String,

    /// Report title
    pub title: String,

    /// Report summary
    pub summary: String,
}
