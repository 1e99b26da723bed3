//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use tourbook_core::BookingService;

/// Application state shared across all HTTP handlers.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use tourbook_core::{environment::SystemClock, BookingService};
/// use tourbook_web::AppState;
///
/// let service = BookingService::new(Arc::new(store), Arc::new(SystemClock));
/// let state = AppState::new(service).with_metrics(prometheus_handle);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Booking operations
    pub service: BookingService,
    /// Prometheus recorder handle, `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state without a metrics recorder.
    #[must_use]
    pub const fn new(service: BookingService) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    /// Expose the given recorder at `GET /metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        // Ensure AppState implements Clone (required for Axum)
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
