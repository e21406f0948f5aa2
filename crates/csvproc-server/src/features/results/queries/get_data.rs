use std::sync::Arc;

use csvproc_common::NormalizedRecord;

use crate::store::{ResultStore, StoreError};

#[derive(Debug, Clone)]
pub struct GetDataQuery {
    pub data_id: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GetDataError {
    #[error("Data not found or expired")]
    NotFound,
}

impl From<StoreError> for GetDataError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => GetDataError::NotFound,
        }
    }
}

#[tracing::instrument(skip(store))]
pub fn handle(
    store: &ResultStore,
    query: GetDataQuery,
) -> Result<Arc<[NormalizedRecord]>, GetDataError> {
    Ok(store.get(&query.data_id)?)
}
