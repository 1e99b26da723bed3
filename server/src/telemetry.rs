//! Logging and metrics setup.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "tourbook=info,tower_http=debug,sqlx=warn";

/// Install the global tracing subscriber.
///
/// Reads `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the Prometheus recorder and describe the booking metrics.
///
/// # Errors
///
/// Returns an error if a recorder is already installed.
pub fn install_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        // Latency buckets for request-scoped work
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        )?
        .install_recorder()?;

    describe_metrics();
    Ok(handle)
}

fn describe_metrics() {
    describe_counter!("bookings_created_total", "Bookings confirmed");
    describe_counter!(
        "bookings_rejected_total",
        "Booking requests rejected, labelled by reason"
    );
    describe_counter!(
        "promo_validations_total",
        "Promo code checks, labelled by outcome"
    );
    describe_histogram!(
        "booking_create_duration_seconds",
        "Time taken to validate, price and persist a booking"
    );
}
