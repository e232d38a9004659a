//! Oddslab Service - HTTP API for usage tracking and tier gating.
//!
//! This is the main entry point for the oddslab service.

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oddslab_service::{create_router, AppState, ServiceConfig};
use oddslab_store::SqliteStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,oddslab=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Oddslab Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        database_path = %config.database_path,
        "Service configuration loaded"
    );

    // Open the SQLite store
    if let Some(parent) = Path::new(&config.database_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tracing::info!(path = %config.database_path, "Opening SQLite store");
    let store = Arc::new(SqliteStore::open(&config.database_path).await?);

    // Build app state
    let state = AppState::new(store, config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
