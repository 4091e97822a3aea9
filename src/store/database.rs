//! Database operations for the store module

use crate::store::error::DbError;
use crate::store::schema;
use crate::store::{ReportRecord, ReportSummary, StoredReport};
use chrono::Utc;
use libsql::{Connection, Row, params};
use tracing::{debug, instrument};

/// Database manager for stored reports
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database manager over an open connection
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, DbError> {
        schema::initialize_schema(&conn).await?;
        Ok(Self { conn })
    }

    /// Create a new database manager from a path
    pub async fn new_from_path(path: &str) -> Result<Self, DbError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| DbError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Save a finished report and return its generated identifier.
    pub async fn save_report(&self, record: &ReportRecord) -> Result<i64, DbError> {
        let created_at = Utc::now().to_rfc3339();
        let report_json = serde_json::to_string(record)
            .map_err(|e| DbError::Data(format!("Failed to serialize report: {}", e)))?;

        self.conn
            .execute(
                "INSERT INTO reports (query, created_at, title, summary, report_json)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    record.query.clone(),
                    created_at,
                    record.report.title.clone(),
                    record.report.summary.clone(),
                    report_json,
                ],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to save report: {}", e)))?;

        let mut rows = self
            .conn
            .query("SELECT last_insert_rowid()", params![])
            .await
            .map_err(|e| DbError::Query(format!("Failed to get last insert ID: {}", e)))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => {
                return Err(DbError::Data(
                    "No ID returned from last_insert_rowid()".to_string(),
                ));
            }
            Err(e) => return Err(DbError::Data(format!("Failed to get ID: {}", e))),
        };

        let id = row
            .get(0)
            .map_err(|e| DbError::Data(format!("Failed to get ID: {}", e)))?;
        debug!("Saved report {}", id);
        Ok(id)
    }

    /// Get one stored report by identifier.
    pub async fn get_report(&self, id: i64) -> Result<Option<StoredReport>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, query, created_at, title, summary, report_json
                 FROM reports
                 WHERE id = ?",
                params![id],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to get report: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_report(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DbError::Data(format!("Failed to get report: {}", e))),
        }
    }

    /// List stored reports, most recent first.
    #[instrument(skip(self))]
    pub async fn list_reports(&self, limit: usize) -> Result<Vec<ReportSummary>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, query, created_at, title, summary
                 FROM reports
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?",
                params![limit as i64],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to list reports: {}", e)))?;

        let mut summaries = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            summaries.push(ReportSummary {
                id: row
                    .get(0)
                    .map_err(|e| DbError::Data(format!("Failed to get id: {}", e)))?,
                query: row
                    .get(1)
                    .map_err(|e| DbError::Data(format!("Failed to get query: {}", e)))?,
                created_at: row
                    .get(2)
                    .map_err(|e| DbError::Data(format!("Failed to get created_at: {}", e)))?,
                title: row
                    .get(3)
                    .map_err(|e| DbError::Data(format!("Failed to get title: {}", e)))?,
                summary: row
                    .get(4)
                    .map_err(|e| DbError::Data(format!("Failed to get summary: {}", e)))?,
            });
        }

        Ok(summaries)
    }
}

fn row_to_report(row: &Row) -> Result<StoredReport, DbError> {
    let report_json: String = row
        .get(5)
        .map_err(|e| DbError::Data(format!("Failed to get report_json: {}", e)))?;
    let record: ReportRecord = serde_json::from_str(&report_json)
        .map_err(|e| DbError::Data(format!("Failed to deserialize report: {}", e)))?;

    Ok(StoredReport {
        id: row
            .get(0)
            .map_err(|e| DbError::Data(format!("Failed to get id: {}", e)))?,
        query: row
            .get(1)
            .map_err(|e| DbError::Data(format!("Failed to get query: {}", e)))?,
        created_at: row
            .get(2)
            .map_err(|e| DbError::Data(format!("Failed to get created_at: {}", e)))?,
        title: row
            .get(3)
            .map_err(|e| DbError::Data(format!("Failed to get title: {}", e)))?,
        summary: row
            .get(4)
            .map_err(|e| DbError::Data(format!("Failed to get summary: {}", e)))?,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Reference, Report};

    fn sample_record(query: &str) -> ReportRecord {
        ReportRecord {
            query: query.to_string(),
            sources: vec![crate::collect::Source {
                url: "https://example.com/a".parse().unwrap(),
                title: "A source".to_string(),
                content: "some extracted text".to_string(),
            }],
            skipped_sources: vec![crate::collect::SkippedSource {
                url: "https://youtube.com/watch".parse().unwrap(),
                title: "A video".to_string(),
                reason: "Blocked domain".to_string(),
            }],
            report: Report {
                title: format!("Report on {}", query),
                summary: "A short summary.".to_string(),
                key_points: vec!["one".to_string(), "two".to_string()],
                references: vec![Reference {
                    url: "https://example.com/a".to_string(),
                    note: "the source".to_string(),
                }],
                raw_model_response: "{}".to_string(),
            },
            processing_time_seconds: 1.23,
        }
    }

    async fn temp_database() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.db");
        let db = Database::new_from_path(path.to_str().unwrap())
            .await
            .unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_save_yields_unique_identifiers() {
        let (_dir, db) = temp_database().await;

        let first = db.save_report(&sample_record("alpha")).await.unwrap();
        let second = db.save_report(&sample_record("beta")).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let (_dir, db) = temp_database().await;

        let id = db.save_report(&sample_record("solar sails")).await.unwrap();
        let stored = db.get_report(id).await.unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.query, "solar sails");
        assert_eq!(stored.title, "Report on solar sails");
        assert_eq!(stored.record.sources.len(), 1);
        assert_eq!(stored.record.skipped_sources[0].reason, "Blocked domain");
        assert_eq!(stored.record.processing_time_seconds, 1.23);
    }

    #[tokio::test]
    async fn test_get_missing_report_is_none() {
        let (_dir, db) = temp_database().await;
        assert!(db.get_report(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first_and_limited() {
        let (_dir, db) = temp_database().await;

        for query in ["first", "second", "third"] {
            db.save_report(&sample_record(query)).await.unwrap();
        }

        let summaries = db.list_reports(2).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].query, "third");
        assert_eq!(summaries[1].query, "second");
    }

    #[tokio::test]
    async fn test_reopening_keeps_existing_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.db");

        let db = Database::new_from_path(path.to_str().unwrap())
            .await
            .unwrap();
        let id = db.save_report(&sample_record("persist me")).await.unwrap();
        drop(db);

        let reopened = Database::new_from_path(path.to_str().unwrap())
            .await
            .unwrap();
        let stored = reopened.get_report(id).await.unwrap().unwrap();
        assert_eq!(stored.query, "persist me");
    }
}
