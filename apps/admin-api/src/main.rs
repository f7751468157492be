//! # Lumen Admin API Server
//!
//! Startup sequence: tracing → config → connect both stores → migrations →
//! router → serve with graceful shutdown.

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use lumen_admin_api::{router, AdminConfig, AppState};
use lumen_db::{CatalogDb, DbConfig, InventoryDb};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Lumen admin API server...");

    let config = AdminConfig::load()?;
    info!(
        port = config.http_port,
        catalog = %config.catalog_db_path,
        inventory = %config.inventory_db_path,
        "Configuration loaded"
    );

    // Catalog store: ours, migrated on startup
    let catalog = CatalogDb::new(DbConfig::new(&config.catalog_db_path)).await?;
    info!("Connected to catalog store");

    // Inventory source: read-only; schema provisioning only for a local
    // stand-in store
    let inventory = InventoryDb::new(
        DbConfig::new(&config.inventory_db_path)
            .run_migrations(config.provision_inventory_schema),
    )
    .await?;
    info!("Connected to inventory source");

    let state = AppState::new(catalog, inventory);
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
