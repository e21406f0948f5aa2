//! CSV Processor Server Library
//!
//! HTTP service that normalizes social-media and news CSV exports into a
//! common record shape and keeps each result set in memory for 24 hours.
//!
//! # Overview
//!
//! - **Ingest**: encoding detection, delimiter fallback, column alias
//!   resolution and row normalization ([`ingest`])
//! - **Store**: expiring in-memory result sets ([`store`])
//! - **API**: upload and retrieval endpoints ([`api`], [`features`])
//! - **Configuration**: environment-based settings ([`config`])
//! - **Middleware**: CORS and request tracing ([`middleware`])
//!
//! # Example
//!
//! ```no_run
//! use csvproc_server::{api, config::Config, store::ResultStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config, ResultStore::new(), std::future::pending()).await?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod config;
pub mod features;
pub mod ingest;
pub mod middleware;
pub mod store;
