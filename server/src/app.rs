//! Application assembly: store, service, router and CORS.

use crate::config::{Config, PostgresConfig, ServerConfig};
use axum::http::HeaderValue;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tourbook_core::environment::SystemClock;
use tourbook_core::{BookingService, BookingStore, StoreError};
use tourbook_postgres::PostgresBookingStore;
use tourbook_web::{build_router, AppState};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Open the connection pool described by `config`.
///
/// # Errors
///
/// Returns an error if the database cannot be reached.
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.idle_timeout)))
        .connect(&config.url)
        .await
}

/// Build the Postgres store, migrating the schema if configured to.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn postgres_store(
    pool: PgPool,
    config: &PostgresConfig,
) -> Result<PostgresBookingStore, StoreError> {
    let store = PostgresBookingStore::new(pool);
    if config.run_migrations {
        tracing::info!("Running database migrations...");
        store.migrate().await?;
        tracing::info!("Migrations complete");
    }
    Ok(store)
}

/// Wire a store into the HTTP router.
pub fn build_app(
    config: &Config,
    store: Arc<dyn BookingStore>,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let service = BookingService::new(store, Arc::new(SystemClock));

    let mut state = AppState::new(service);
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    build_router(state).layer(cors_layer(&config.server))
}

/// CORS policy for the browser client.
///
/// An empty origin list allows any origin. Origins that aren't valid header
/// values are skipped with a warning.
#[must_use]
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(origin = %origin, error = %err, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
