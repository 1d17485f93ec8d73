//! ShareDrop Server: real-time collaboration on shared photo folders
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use sharedrop_api::{AppState, build_router};
use sharedrop_core::config::AppConfig;
use sharedrop_core::error::AppError;
use sharedrop_realtime::RealtimeEngine;

#[tokio::main]
async fn main() {
    let env = std::env::var("SHAREDROP_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ShareDrop v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Durable store ────────────────────────────────────
    tracing::info!(backend = ?config.database.backend, "Opening store...");
    let store = sharedrop_database::open_store(&config.database).await?;

    // ── Step 2: Real-time engine ─────────────────────────────────
    let realtime = RealtimeEngine::start(&config.realtime);

    // ── Step 3: Services and router ──────────────────────────────
    let addr = config.server.bind_address();
    let state = AppState::new(config, store, realtime.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("ShareDrop server listening on {}", addr);

    // ── Step 4: Serve until a shutdown signal ────────────────────
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await;

    // Close every live connection even when serving failed.
    realtime.shutdown().await;

    served.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
    tracing::info!("ShareDrop server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
