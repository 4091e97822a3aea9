//! Database schema for stored reports
//!
//! One table holds finished reports: the query, denormalized title and
//! summary columns for cheap listing, and the full report object as
//! JSON. Initialization is idempotent, so opening the store always
//! leaves a usable schema behind.

use crate::store::error::DbError;
use libsql::{Connection, params};

/// Initialize the database schema
pub async fn initialize_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            query TEXT NOT NULL,
            created_at TEXT NOT NULL,
            title TEXT,
            summary TEXT,
            report_json TEXT NOT NULL
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create reports table: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_reports_created_at ON reports(created_at)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create index on reports: {}", e)))?;

    Ok(())
}
