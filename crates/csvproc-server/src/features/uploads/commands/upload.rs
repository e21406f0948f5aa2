use csvproc_common::{NormalizedRecord, SourceType};
use serde::{Deserialize, Serialize};

use crate::ingest::{process_csv_content, ProcessingError};
use crate::store::ResultStore;

/// Accepted filename suffix, matched case-sensitively
pub const CSV_EXTENSION: &str = ".csv";

#[derive(Debug, Clone)]
pub struct UploadCsvCommand {
    pub source_type: SourceType,
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCsvResponse {
    pub message: String,
    pub data_id: String,
    pub data_url: String,
    pub records_processed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadCsvError {
    #[error("File must be a CSV")]
    NotCsv,
    #[error("No file uploaded")]
    MissingFile,
    #[error("Error processing file: {0}")]
    Processing(#[from] ProcessingError),
}

impl UploadCsvCommand {
    pub fn validate(&self) -> Result<(), UploadCsvError> {
        if !self.filename.ends_with(CSV_EXTENSION) {
            return Err(UploadCsvError::NotCsv);
        }
        Ok(())
    }
}

/// Path at which a stored result set can be fetched
pub fn data_url(data_id: &str) -> String {
    format!("/get-data/{}", data_id)
}

fn success_message(source_type: SourceType) -> &'static str {
    match source_type {
        SourceType::Twitter => "Twitter CSV processed successfully",
        SourceType::News => "News CSV processed successfully",
    }
}

#[tracing::instrument(
    skip(store, command),
    fields(
        source = %command.source_type,
        filename = %command.filename,
        size = command.content.len()
    )
)]
pub async fn handle(
    store: ResultStore,
    command: UploadCsvCommand,
) -> Result<UploadCsvResponse, UploadCsvError> {
    command.validate()?;

    let UploadCsvCommand {
        source_type,
        filename,
        content,
    } = command;

    let records: Vec<NormalizedRecord> =
        tokio::task::spawn_blocking(move || process_csv_content(&content, source_type))
            .await
            .map_err(|e| ProcessingError::Task(e.to_string()))??;

    let summary = store.put(source_type, filename, records);

    Ok(UploadCsvResponse {
        message: success_message(source_type).to_string(),
        data_url: data_url(&summary.id),
        data_id: summary.id,
        records_processed: summary.record_count,
    })
}
