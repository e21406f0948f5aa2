//! CSV Processor Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the CSV processor workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`CsvProcError`] and the [`Result`] alias
//! - **Logging**: centralized `tracing` setup driven by environment variables
//! - **Types**: the source-type tag and the normalized record shape
//!
//! # Example
//!
//! ```no_run
//! use csvproc_common::types::{NormalizedRecord, SourceType};
//!
//! let record = NormalizedRecord::new(
//!     SourceType::News,
//!     "https://example.com/a",
//!     "Headline",
//!     "Unknown",
//!     "",
//! );
//! assert_eq!(record.source, "News");
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CsvProcError, Result};
pub use types::{NormalizedRecord, SourceType};
