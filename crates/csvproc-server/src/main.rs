//! CSV Processor Server - Main entry point

use anyhow::Result;
use csvproc_common::logging::{init_logging, LogConfig};
use tokio::signal;
use tracing::info;

use csvproc_server::{api, config::Config, store::ResultStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("csvproc-server")
        .filter_directives("csvproc_server=debug,tower_http=debug")
        .build()
        .merge_env()?;

    let _logging_guard = init_logging(&log_config)?;

    info!("Starting CSV Processor Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}",
        config.server.bind_address()
    );

    let store = ResultStore::new();
    info!(retention_secs = store.retention().as_secs(), "Result store initialized");

    api::serve(config, store, shutdown_signal()).await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
