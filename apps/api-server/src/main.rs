//! # BillEase API
//!
//! HTTP entry point.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BillEase API Server                              │
//! │                                                                         │
//! │  config ──► tracing ──► Database::in_memory ──► build_router           │
//! │                          (schema + seed)            │                   │
//! │                                                     ▼                   │
//! │                           TcpListener (3001) ──► axum::serve            │
//! │                                                     │                   │
//! │                                  Ctrl+C / SIGTERM ──┘ graceful stop     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billease_api::{build_router, AppState, ServerConfig};
use billease_db::Database;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        port = config.port,
        environment = %config.environment,
        origins = config.allowed_origins.len(),
        "Configuration loaded"
    );

    let db = Database::in_memory()?;

    let addr = config.bind_address();
    let app = build_router(AppState::new(db, config));

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "BillEase Suite API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
