//! Catalog Import - pipeline driver

use anyhow::Result;
use catalog_common::logging::{init_logging, LogConfig, LogLevel};
use catalog_import::config::ImportConfig;
use catalog_import::event::ObjectCreatedEvent;
use catalog_import::pipeline::ImportPipeline;
use catalog_import::publisher::SqsPublisher;
use catalog_import::storage::{Storage, StorageConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "catalog-import")]
#[command(author, version, about = "Product catalog CSV import pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process an object-created notification from a JSON document
    Event {
        /// Path to the notification JSON
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Process a single staged object directly
    Object {
        /// Object key under the staging prefix
        #[arg(short, long)]
        key: String,

        /// Bucket override (defaults to IMPORT_BUCKET_NAME)
        #[arg(short, long)]
        bucket: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Set LOG_* environment variables override the flag-derived defaults.
    let log_config = LogConfig::builder()
        .level(log_level)
        .build()
        .with_env_overrides()?;

    init_logging(&log_config)?;

    let config = ImportConfig::load()?;

    let storage = Storage::new(StorageConfig::from_env()?).await?;
    let publisher = SqsPublisher::new(&config.region, config.queue_url.clone()).await;
    let pipeline = ImportPipeline::new(Arc::new(storage), Arc::new(publisher));

    match cli.command {
        Command::Event { file } => {
            info!("Processing notification from {}", file.display());

            let raw = tokio::fs::read_to_string(&file).await?;
            let event: ObjectCreatedEvent = serde_json::from_str(&raw)?;

            let outcomes = pipeline.process_event(&event).await;
            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

            info!(
                processed = outcomes.len() - failed,
                failed = failed,
                "Notification batch complete"
            );

            if failed > 0 {
                anyhow::bail!("{} of {} objects failed to import", failed, outcomes.len());
            }
        },
        Command::Object { key, bucket } => {
            let bucket = bucket.unwrap_or_else(|| config.bucket.clone());

            let summary = pipeline.process_object(&bucket, &key).await?;
            info!(
                rows = summary.rows_published,
                parsed_key = %summary.parsed_key,
                "Import complete"
            );
        },
    }

    Ok(())
}
