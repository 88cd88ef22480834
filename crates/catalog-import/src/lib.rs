//! Catalog Import Library
//!
//! Streaming CSV import pipeline for the product catalog: a staged object is
//! fetched from the file store, decoded row by row, fanned out to the work
//! queue one message per row, then relocated under the parsed prefix.
//!
//! # Components
//!
//! - [`decoder`]: delimited-text stream → ordered sequence of decoded rows
//! - [`publisher`]: one acknowledged queue message per decoded row
//! - [`pipeline`]: per-object Fetching → Streaming → Finalizing orchestration
//! - [`storage`]: object store trait and S3 implementation
//! - [`event`]: object-created notification model
//!
//! # Example
//!
//! ```no_run
//! use catalog_import::pipeline::ImportPipeline;
//! use catalog_import::publisher::SqsPublisher;
//! use catalog_import::storage::{Storage, StorageConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = Storage::new(StorageConfig::from_env()?).await?;
//!     let publisher = SqsPublisher::new("us-east-2", "https://sqs/queue-url").await;
//!
//!     let pipeline = ImportPipeline::new(Arc::new(storage), Arc::new(publisher));
//!     pipeline
//!         .process_object("import-bucket", "uploaded/products.csv")
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decoder;
pub mod event;
pub mod keys;
pub mod pipeline;
pub mod publisher;
pub mod storage;

// Re-export commonly used types
pub use config::ImportConfig;
pub use decoder::{DecodedRow, RowDecoder};
pub use event::ObjectCreatedEvent;
pub use pipeline::{ImportPipeline, ImportSummary, ObjectOutcome};
