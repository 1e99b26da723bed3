//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints.

use crate::handlers::{bookings, experiences, health, promo};
use crate::state::AppState;
use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the complete Axum router.
///
/// Configures:
/// - Health, readiness and metrics endpoints at the root
/// - Catalog, booking and promo endpoints under `/api`
/// - Request ids (generated unless the client sends one) and request tracing
///
/// CORS is left to the caller since allowed origins are deployment config.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Catalog
        .route("/experiences", get(experiences::list_experiences))
        .route("/experiences/:id", get(experiences::get_experience))
        .route("/experiences/:id/slots", get(experiences::list_slots))
        // Checkout
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:booking_id", get(bookings::get_booking))
        .route("/promo/validate", post(promo::validate_promo));

    let request_tracing = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id());

    Router::new()
        // Operational endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api", api_routes)
        .layer(request_tracing)
        .with_state(state)
}
