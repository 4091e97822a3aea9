//! # Dossier CLI Application
//!
//! This module implements the command-line interface for the dossier
//! pipeline, providing access to its research capabilities through a
//! set of subcommands.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands:
//!   - `research`: run the full pipeline for a query
//!   - `list`: list stored reports, most recent first
//!   - `show`: display one stored report
//!
//! Credentials come from the environment (`SERPAPI_API_KEY`, and
//! optionally `GEMINI_API_KEY`); reports land in a local database file.

use clap::{Args, Parser, Subcommand};
use dossier::config::Config;
use dossier::llm::ModelHandle;
use dossier::pipeline::{EventSink, Pipeline, PipelineEvent, PipelineOutcome};
use dossier::search::SearchClient;
use dossier::store::Database;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "A research-report pipeline: search, extract, synthesize", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the research pipeline for a query
    Research(ResearchArgs),

    /// List stored reports
    List(ListArgs),

    /// Show one stored report
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct ResearchArgs {
    /// Query to research
    #[arg(required = true)]
    query: String,

    /// Number of search results to process
    #[arg(short, long, default_value = "3")]
    results: usize,

    /// Database path
    #[arg(long, default_value = "reports.db")]
    database: PathBuf,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Limit results
    #[arg(short, long, default_value = "50")]
    limit: usize,

    /// Database path
    #[arg(long, default_value = "reports.db")]
    database: PathBuf,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Report identifier
    #[arg(required = true)]
    id: i64,

    /// Database path
    #[arg(long, default_value = "reports.db")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Research(args) => research_command(args).await?,
        Commands::List(args) => list_command(args).await?,
        Commands::Show(args) => show_command(args).await?,
    }

    Ok(())
}

/// Sink that prints pipeline progress to the console
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::SearchStarted { query } => {
                println!("Searching for: {}", query);
            }
            PipelineEvent::SearchCompleted { results } => {
                println!("Found {} search results", results);
            }
            PipelineEvent::SourceProcessing {
                index,
                total,
                title,
            } => {
                println!("Processing source {}/{}: {}", index, total, title);
            }
            PipelineEvent::SourceAccepted { url, chars } => {
                println!("  Extracted {} characters from {}", chars, url);
            }
            PipelineEvent::SourceSkipped { url, reason } => {
                println!("  Skipped {}: {}", url, reason);
            }
            PipelineEvent::SynthesisStarted { sources } => {
                println!("Generating report from {} sources...", sources);
            }
            PipelineEvent::SynthesisCompleted { title } => {
                println!("Generated report: {}", title);
            }
            PipelineEvent::ReportSaved { report_id } => {
                println!("Saved report {}", report_id);
            }
        }
    }
}

async fn research_command(args: ResearchArgs) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    config.result_count = args.results;

    let search = SearchClient::new(&config.search_api_key, config.search_timeout)?;
    let model = ModelHandle::from_credential(config.model_api_key.as_deref());
    let store = Database::new_from_path(&args.database.to_string_lossy()).await?;

    let mut pipeline = Pipeline::new(config, search, model, store)?;
    if args.format == "text" {
        pipeline = pipeline.with_event_sink(Arc::new(ConsoleSink));
    }

    let outcome = pipeline.run(&args.query).await;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        _ => print_outcome(&outcome),
    }

    Ok(())
}

fn print_outcome(outcome: &PipelineOutcome) {
    if outcome.success {
        println!(
            "Report saved with ID: {}",
            outcome.report_id.unwrap_or_default()
        );
        println!("Sources used: {}", outcome.sources_found);
    } else {
        println!(
            "Research failed: {}",
            outcome.error.as_deref().unwrap_or("Unknown error")
        );
    }

    if !outcome.skipped_sources.is_empty() {
        println!("Skipped sources:");
        for skipped in &outcome.skipped_sources {
            println!("  {} - {}", skipped.url, skipped.reason);
        }
    }

    println!("Processing time: {:.2}s", outcome.processing_time_seconds);
}

async fn list_command(args: ListArgs) -> anyhow::Result<()> {
    let store = Database::new_from_path(&args.database.to_string_lossy()).await?;
    let summaries = store.list_reports(args.limit).await?;

    println!("Stored reports: {}", summaries.len());
    for summary in summaries {
        println!(
            "{}. [{}] {} - {}",
            summary.id, summary.created_at, summary.query, summary.title
        );
    }

    Ok(())
}

async fn show_command(args: ShowArgs) -> anyhow::Result<()> {
    let store = Database::new_from_path(&args.database.to_string_lossy()).await?;

    let Some(stored) = store.get_report(args.id).await? else {
        println!("Report {} not found", args.id);
        return Ok(());
    };

    println!("{}", stored.title);
    println!("Query: {}", stored.query);
    println!("Created: {}", stored.created_at);
    println!();
    println!("{}", stored.summary);
    println!();

    println!("Key points:");
    for point in &stored.record.report.key_points {
        println!("  - {}", point);
    }

    println!();
    println!("References:");
    for reference in &stored.record.report.references {
        println!("  {} ({})", reference.note, reference.url);
    }

    if !stored.record.skipped_sources.is_empty() {
        println!();
        println!("Skipped sources:");
        for skipped in &stored.record.skipped_sources {
            println!("  {} - {}", skipped.url, skipped.reason);
        }
    }

    println!();
    println!(
        "Processing time: {:.2}s",
        stored.record.processing_time_seconds
    );

    Ok(())
}
