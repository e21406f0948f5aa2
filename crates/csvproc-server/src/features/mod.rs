//! Feature slices of the CSV processor API
//!
//! - **uploads**: accept a CSV upload, normalize it and store the result
//! - **results**: fetch a stored result set by id
//!
//! Write operations live under `commands/`, reads under `queries/`, and each
//! slice exposes its HTTP surface from `routes.rs`.

pub mod results;
pub mod uploads;

use axum::Router;

use crate::store::ResultStore;

/// Shared state for all feature routes
#[derive(Debug, Clone, Default)]
pub struct FeatureState {
    pub store: ResultStore,
}

/// Creates the router with every feature route mounted at the root
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .merge(uploads::uploads_routes().with_state(state.store.clone()))
        .merge(results::results_routes().with_state(state.store))
}
