pub mod response;

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};

use crate::config::Config;
use crate::features;
use crate::middleware;
use crate::store::ResultStore;
use response::{ErrorResponse, HealthResponse, MessageResponse};

pub async fn serve<F>(config: Config, store: ResultStore, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(store, &config);

    let addr: SocketAddr = config.server.bind_address().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Build the application router with all routes and middleware
pub fn create_router(store: ResultStore, config: &Config) -> Router {
    let feature_state = features::FeatureState {
        store: store.clone(),
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(store)
        .merge(features::router(feature_state))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer())
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("CSV Processor API is running"))
}

async fn health(State(store): State<ResultStore>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        stored_results: store.len(),
    })
}

async fn not_found() -> Response {
    ErrorResponse::new("Not Found").with_status(StatusCode::NOT_FOUND)
}
