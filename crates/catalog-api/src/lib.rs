//! Catalog API Library
//!
//! HTTP surface for the product catalog import service.
//!
//! # Overview
//!
//! - **Upload Link Issuer**: `GET /import?name=<file>` returns a time-boxed
//!   presigned URL writing to `uploaded/<file>` in the import bucket
//! - **Basic Authorizer**: fail-closed basic-auth guard on the import surface
//! - **Middleware**: CORS and request tracing
//!
//! # Example
//!
//! ```no_run
//! use catalog_api::{api, config::ApiConfig};
//! use catalog_import::storage::{Storage, StorageConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ApiConfig::load()?;
//!     let storage = Storage::new(StorageConfig::from_env()?).await?;
//!
//!     let state = api::AppState {
//!         store: Arc::new(storage),
//!         upload: config.upload.clone(),
//!         auth: config.auth.clone(),
//!     };
//!
//!     let app = api::create_router(state, &config.cors);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod features;

// Re-export commonly used types
pub use api::{create_router, AppState};
pub use config::ApiConfig;
