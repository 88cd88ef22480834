//! Catalog Common Library
//!
//! Shared error handling and logging for the catalog import workspace.
//!
//! # Overview
//!
//! This crate provides the functionality used across all workspace members:
//!
//! - **Error Handling**: The [`CatalogError`] taxonomy and [`Result`] alias
//! - **Logging**: Tracing subscriber configuration and initialization
//!
//! # Example
//!
//! ```no_run
//! use catalog_common::{CatalogError, Result};
//!
//! fn staged_key(file_name: &str) -> Result<String> {
//!     if file_name.is_empty() {
//!         return Err(CatalogError::InvalidRequest("empty file name".into()));
//!     }
//!     Ok(format!("uploaded/{}", file_name))
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CatalogError, Result};
