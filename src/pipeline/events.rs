//! Pipeline progress events
//!
//! The orchestrator reports progress through a sink trait instead of
//! writing to the console, so callers can render progress however they
//! like. The default sink forwards everything to the tracing
//! subscriber.

use tracing::info;

/// A progress event emitted while a query runs
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// The search stage began
    SearchStarted {
        /// The query being researched
        query: String,
    },

    /// The search stage finished
    SearchCompleted {
        /// Usable results returned
        results: usize,
    },

    /// One search result entered processing
    SourceProcessing {
        /// Position in the batch, starting at one
        index: usize,
        /// Batch size
        total: usize,
        /// Result title
        title: String,
    },

    /// A source passed extraction and validation
    SourceAccepted {
        /// Source URL
        url: String,
        /// Characters of extracted content
        chars: usize,
    },

    /// A source was rejected
    SourceSkipped {
        /// Source URL
        url: String,
        /// Recorded reason
        reason: String,
    },

    /// Synthesis began
    SynthesisStarted {
        /// Accepted sources handed to the synthesizer
        sources: usize,
    },

    /// Synthesis finished
    SynthesisCompleted {
        /// Title of the produced report
        title: String,
    },

    /// The report was persisted
    ReportSaved {
        /// Generated identifier
        report_id: i64,
    },
}

/// Receiver for pipeline progress events
pub trait EventSink: Send + Sync {
    /// Handle one event
    fn emit(&self, event: PipelineEvent);
}

/// Sink that forwards events to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::SearchStarted { query } => {
                info!("Searching for: {}", query);
            }
            PipelineEvent::SearchCompleted { results } => {
                info!("Found {} search results", results);
            }
            PipelineEvent::SourceProcessing { index, total, title } => {
                info!("Processing source {}/{}: {}", index, total, title);
            }
            PipelineEvent::SourceAccepted { url, chars } => {
                info!("Accepted {} ({} characters)", url, chars);
            }
            PipelineEvent::SourceSkipped { url, reason } => {
                info!("Skipped {}: {}", url, reason);
            }
            PipelineEvent::SynthesisStarted { sources } => {
                info!("Synthesizing report from {} sources", sources);
            }
            PipelineEvent::SynthesisCompleted { title } => {
                info!("Synthesized report: {}", title);
            }
            PipelineEvent::ReportSaved { report_id } => {
                info!("Report saved with ID: {}", report_id);
            }
        }
    }
}
