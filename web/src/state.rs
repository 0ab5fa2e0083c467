//! Application state for Axum handlers.

use hotel_booking_runtime::metrics::MetricsExporter;
use hotel_booking_runtime::retry::RetryPolicy;
use hotel_booking_runtime::{BookingConfig, BookingEnvironment, BookingService, CatalogService};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cheap to clone: the services hold their collaborators behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Hotels, rooms and offers
    pub catalog: CatalogService,
    /// Quotes and bookings
    pub bookings: BookingService,
    /// Prometheus scrape source
    pub metrics: Arc<MetricsExporter>,
    /// Retry policy for transient failures
    pub retry: RetryPolicy,
}

impl AppState {
    /// Builds both services over one environment.
    #[must_use]
    pub fn new(
        env: BookingEnvironment,
        config: BookingConfig,
        metrics: Arc<MetricsExporter>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            catalog: CatalogService::new(env.clone()),
            bookings: BookingService::new(env, config),
            metrics,
            retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        // Ensure AppState implements Clone (required for Axum)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
