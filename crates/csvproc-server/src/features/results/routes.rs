use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::api::response::ErrorResponse;
use crate::store::ResultStore;

use super::queries::{GetDataError, GetDataQuery};

pub fn results_routes() -> Router<ResultStore> {
    Router::new().route("/get-data/:data_id", get(get_data))
}

#[tracing::instrument(skip(store))]
async fn get_data(
    State(store): State<ResultStore>,
    Path(data_id): Path<String>,
) -> Result<Response, ResultsApiError> {
    let records = super::queries::get_data::handle(&store, GetDataQuery { data_id })?;

    tracing::debug!(records = records.len(), "Result set served");

    Ok(Json(&*records).into_response())
}

#[derive(Debug, thiserror::Error)]
enum ResultsApiError {
    #[error(transparent)]
    GetData(#[from] GetDataError),
}

impl IntoResponse for ResultsApiError {
    fn into_response(self) -> Response {
        match self {
            ResultsApiError::GetData(GetDataError::NotFound) => {
                tracing::debug!("{}", self);
                ErrorResponse::new(self.to_string()).with_status(StatusCode::NOT_FOUND)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let response = ResultsApiError::from(GetDataError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_display() {
        let err = ResultsApiError::from(GetDataError::NotFound);
        assert_eq!(err.to_string(), "Data not found or expired");
    }
}
