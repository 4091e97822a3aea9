//! Pipeline orchestration
//!
//! This module sequences the whole research flow for one query:
//! search, source collection, report synthesis, and persistence.
//!
//! ## Key Components
//!
//! - `Pipeline`: holds the wired-up service handles and runs queries
//! - `PipelineOutcome`: the terminal object returned to the caller,
//!   with disjoint success and failure shapes
//! - `PipelineEvent`/`EventSink`: the structured progress interface
//!
//! Each stage can short-circuit to a failure outcome; per-source
//! failures are isolated inside collection and surface only in the
//! skipped list. No stage panics or returns an unhandled error to the
//! caller.

mod events;

pub use events::{EventSink, PipelineEvent, TracingSink};

use crate::collect::{self, SkippedSource};
use crate::config::Config;
use crate::error::Result;
use crate::fetch;
use crate::llm::ModelHandle;
use crate::report;
use crate::search::SearchClient;
use crate::store::{Database, ReportRecord};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Terminal outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    /// Whether a report was produced and saved
    pub success: bool,

    /// Identifier of the saved report, on success
    pub report_id: Option<i64>,

    /// What went wrong, on failure
    pub error: Option<String>,

    /// Accepted sources
    pub sources_found: usize,

    /// Rejected sources with reasons
    pub skipped_sources: Vec<SkippedSource>,

    /// Wall-clock seconds, rounded to two decimals
    pub processing_time_seconds: f64,
}

impl PipelineOutcome {
    fn report_saved(
        report_id: i64,
        sources_found: usize,
        skipped_sources: Vec<SkippedSource>,
        processing_time_seconds: f64,
    ) -> Self {
        Self {
            success: true,
            report_id: Some(report_id),
            error: None,
            sources_found,
            skipped_sources,
            processing_time_seconds,
        }
    }

    fn failed(
        error: impl Into<String>,
        sources_found: usize,
        skipped_sources: Vec<SkippedSource>,
        processing_time_seconds: f64,
    ) -> Self {
        Self {
            success: false,
            report_id: None,
            error: Some(error.into()),
            sources_found,
            skipped_sources,
            processing_time_seconds,
        }
    }
}

/// The research pipeline
pub struct Pipeline {
    config: Config,
    search: SearchClient,
    model: ModelHandle,
    store: Database,
    http: reqwest::Client,
    sink: Arc<dyn EventSink>,
}

impl Pipeline {
    /// Wire up a pipeline from its service handles
    pub fn new(
        config: Config,
        search: SearchClient,
        model: ModelHandle,
        store: Database,
    ) -> Result<Self> {
        let http = fetch::http_client()?;
        Ok(Self {
            config,
            search,
            model,
            store,
            http,
            sink: Arc::new(TracingSink),
        })
    }

    /// Replace the default tracing event sink
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run the pipeline for one query.
    ///
    /// Always returns a structured outcome; failures are reported, not
    /// raised.
    #[instrument(skip(self))]
    pub async fn run(&self, query: &str) -> PipelineOutcome {
        let started = Instant::now();
        info!("Starting research for: {}", query);

        self.sink.emit(PipelineEvent::SearchStarted {
            query: query.to_string(),
        });
        let results = self
            .search
            .results_or_empty(query, self.config.result_count)
            .await;
        self.sink.emit(PipelineEvent::SearchCompleted {
            results: results.len(),
        });

        if results.is_empty() {
            return PipelineOutcome::failed(
                "No search results found",
                0,
                Vec::new(),
                elapsed_seconds(started),
            );
        }

        let (sources, skipped) = collect::collect_sources(
            &self.http,
            &results,
            self.config.fetch_timeout,
            self.sink.as_ref(),
        )
        .await;

        if sources.is_empty() {
            return PipelineOutcome::failed(
                "No content could be extracted from any source",
                0,
                skipped,
                elapsed_seconds(started),
            );
        }

        self.sink.emit(PipelineEvent::SynthesisStarted {
            sources: sources.len(),
        });
        let synthesized = report::synthesize(&self.model, &sources, query, &self.config.model).await;
        self.sink.emit(PipelineEvent::SynthesisCompleted {
            title: synthesized.title.clone(),
        });

        let sources_found = sources.len();
        let processing_time_seconds = elapsed_seconds(started);
        let record = ReportRecord {
            query: query.to_string(),
            sources,
            skipped_sources: skipped,
            report: synthesized,
            processing_time_seconds,
        };

        match self.store.save_report(&record).await {
            Ok(report_id) => {
                self.sink.emit(PipelineEvent::ReportSaved { report_id });
                info!("Report {} saved in {:.2}s", report_id, processing_time_seconds);
                PipelineOutcome::report_saved(
                    report_id,
                    sources_found,
                    record.skipped_sources,
                    processing_time_seconds,
                )
            }
            Err(e) => {
                warn!("Database save failed: {}", e);
                PipelineOutcome::failed(
                    format!("Database save failed: {}", e),
                    sources_found,
                    record.skipped_sources,
                    elapsed_seconds(started),
                )
            }
        }
    }
}

fn elapsed_seconds(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 100.0).round() / 100.0
}
