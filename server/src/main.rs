//! Tourbook Server
//!
//! Serves the experience catalog, checkout and promo endpoints.
//!
//! # Usage
//!
//! ```bash
//! # Start PostgreSQL
//! docker run -d -p 5432:5432 -e POSTGRES_PASSWORD=postgres -e POSTGRES_DB=tourbook postgres:16
//!
//! # Run server
//! cargo run --bin tourbook-server
//! ```

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::oneshot;
use tourbook_server::{build_app, connect_pool, postgres_store, telemetry, Config};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    telemetry::init_tracing();
    info!("Starting Tourbook server...");

    let config = Config::from_env();
    info!(
        postgres = %config.postgres.redacted_url(),
        addr = %config.bind_addr(),
        "Configuration loaded"
    );

    let metrics = if config.server.metrics_enabled {
        Some(telemetry::install_metrics()?)
    } else {
        None
    };

    let pool = connect_pool(&config.postgres).await?;
    info!("PostgreSQL connected");
    let store = postgres_store(pool.clone(), &config.postgres).await?;

    let app = build_app(&config, Arc::new(store), metrics);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Tourbook server listening");

    // Signal fires once shutdown starts so in-flight requests get a deadline
    let (draining_tx, draining_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = draining_tx.send(());
    });

    let deadline = Duration::from_secs(config.server.shutdown_timeout);
    tokio::select! {
        result = server.into_future() => result?,
        () = async {
            if draining_rx.await.is_ok() {
                tokio::time::sleep(deadline).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            warn!(timeout_secs = deadline.as_secs(), "Shutdown timed out, dropping open connections");
        }
    }

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (in production environments)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
