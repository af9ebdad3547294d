// src/main.rs

use anyhow::Context;
use inventory_api::infra::telemetry::init_tracing;
use inventory_api::infra::{Config, StoreBackend};
use inventory_api::storage::pool::create_pool;
use inventory_api::transport;
use inventory_api::{MemoryProductStore, PgProductStore, ProductService, ProductStore};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    init_tracing();

    // --- Storage Initialization ---
    let store: Arc<dyn ProductStore> = match &config.store {
        StoreBackend::Postgres(db_config) => {
            info!(max_connections = db_config.max_connections, "connecting to PostgreSQL");
            let pool = create_pool(db_config)
                .await
                .context("failed to connect to the database")?;
            let store = PgProductStore::new(pool);
            store
                .ensure_schema()
                .await
                .context("failed to create the product table")?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            warn!("using the in-memory store; data is lost on restart");
            Arc::new(MemoryProductStore::new())
        }
    };

    // --- Service Initialization ---
    let service = ProductService::new(store);
    if config.seed_sample_products {
        // A failed seed leaves the table as it was; the API still starts.
        if let Err(e) = service.seed_sample_products().await {
            warn!(error = %e, "sample data seeding failed");
        }
    }

    // --- API Server Initialization ---
    let app_state = transport::http::AppState::new(service);
    let app = transport::http::create_app(app_state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("API server listening on http://{}", config.bind_addr);
    info!("Swagger UI available at http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM from the service manager).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown"),
        _ = terminate => info!("Received SIGTERM, starting shutdown"),
    }
}
