//! CSV normalization pipeline
//!
//! Raw upload bytes flow through four stages:
//!
//! ```text
//! bytes -> encoding::detect_encoding -> parser::parse_bytes -> normalizer::normalize_rows
//! ```
//!
//! Decoding and delimiter problems are absorbed by explicit fallbacks inside
//! [`parser`]. Only content that is not tabular under either delimiter
//! surfaces as a [`ProcessingError`].

pub mod aliases;
pub mod encoding;
pub mod normalizer;
pub mod parser;

use csvproc_common::{NormalizedRecord, SourceType};
use thiserror::Error;
use tracing::debug;

pub use aliases::{AliasProfile, SemanticField, UNKNOWN_AUTHOR};
pub use encoding::{detect_encoding, Confidence, DetectedEncoding};
pub use parser::{Delimiter, Row, Table};

/// Failures of the normalization pipeline
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Error tokenizing data. Expected {expected} fields in line {line}, saw {found}")]
    Structural {
        expected: usize,
        line: u64,
        found: usize,
    },

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("Processing task failed: {0}")]
    Task(String),
}

/// Run the full pipeline over one uploaded file
#[tracing::instrument(
    skip(bytes, source_type),
    fields(size = bytes.len(), source = %source_type)
)]
pub fn process_csv_content(
    bytes: &[u8],
    source_type: SourceType,
) -> Result<Vec<NormalizedRecord>, ProcessingError> {
    let detected = detect_encoding(bytes);
    debug!(
        encoding = detected.name(),
        confidence = ?detected.confidence,
        "Detected encoding"
    );

    let table = parser::parse_bytes(bytes, detected)?;
    debug!(
        delimiter = %table.delimiter(),
        columns = table.column_count(),
        rows = table.len(),
        "Parsed table"
    );

    let records = normalizer::normalize_rows(&table, source_type);
    debug!(
        records = records.len(),
        dropped = table.len() - records.len(),
        "Normalized rows"
    );

    Ok(records)
}
