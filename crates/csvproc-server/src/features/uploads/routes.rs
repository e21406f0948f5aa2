use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use csvproc_common::SourceType;

use crate::api::response::ErrorResponse;
use crate::store::ResultStore;

use super::commands::{UploadCsvCommand, UploadCsvError, UploadCsvResponse};

/// Name of the multipart field expected to carry the file
pub const FILE_FIELD: &str = "file";

pub fn uploads_routes() -> Router<ResultStore> {
    Router::new()
        .route("/upload-twitter", post(upload_twitter))
        .route("/upload-news", post(upload_news))
}

async fn upload_twitter(
    State(store): State<ResultStore>,
    multipart: Multipart,
) -> Result<Json<UploadCsvResponse>, UploadApiError> {
    upload(store, SourceType::Twitter, multipart).await
}

async fn upload_news(
    State(store): State<ResultStore>,
    multipart: Multipart,
) -> Result<Json<UploadCsvResponse>, UploadApiError> {
    upload(store, SourceType::News, multipart).await
}

#[tracing::instrument(skip(store, multipart), fields(source = %source_type))]
async fn upload(
    store: ResultStore,
    source_type: SourceType,
    multipart: Multipart,
) -> Result<Json<UploadCsvResponse>, UploadApiError> {
    let (filename, content) = read_file_field(multipart)
        .await?
        .ok_or(UploadCsvError::MissingFile)?;

    let command = UploadCsvCommand {
        source_type,
        filename,
        content,
    };

    let response = super::commands::upload::handle(store, command).await?;

    tracing::info!(
        data_id = %response.data_id,
        records = response.records_processed,
        "CSV processed via API"
    );

    Ok(Json(response))
}

/// Filename and bytes of the uploaded file.
///
/// The field named `file` wins; otherwise the first field carrying a filename
/// is used.
async fn read_file_field(
    mut multipart: Multipart,
) -> Result<Option<(String, Vec<u8>)>, MultipartError> {
    let mut fallback: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let is_file_field = field.name() == Some(FILE_FIELD);
        let filename = field.file_name().map(str::to_string);

        if is_file_field {
            let data = field.bytes().await?;
            return Ok(Some((filename.unwrap_or_default(), data.to_vec())));
        }

        if let (None, Some(filename)) = (&fallback, filename) {
            let data = field.bytes().await?;
            fallback = Some((filename, data.to_vec()));
        }
    }

    Ok(fallback)
}

#[derive(Debug, thiserror::Error)]
enum UploadApiError {
    #[error(transparent)]
    Upload(#[from] UploadCsvError),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for UploadApiError {
    fn into_response(self) -> Response {
        match self {
            UploadApiError::Upload(UploadCsvError::NotCsv)
            | UploadApiError::Upload(UploadCsvError::MissingFile) => {
                tracing::debug!("Rejected upload: {}", self);
                ErrorResponse::new(self.to_string()).with_status(StatusCode::BAD_REQUEST)
            },
            UploadApiError::Multipart(ref err) => {
                let status = err.status();
                tracing::warn!(%status, "Malformed multipart body: {}", err);
                ErrorResponse::new(err.body_text()).with_status(status)
            },
            UploadApiError::Upload(UploadCsvError::Processing(_)) => {
                tracing::error!("Failed to process upload: {}", self);
                ErrorResponse::new(self.to_string()).with_status(StatusCode::INTERNAL_SERVER_ERROR)
            },
        }
    }
}
