//! Prometheus metrics for the booking services.
//!
//! Metrics are recorded through the `metrics` facade everywhere. The server binary installs a
//! Prometheus recorder once through [`MetricsExporter::install`] and serves
//! [`MetricsExporter::render`] at `GET /metrics`. Without an installed recorder every call is a
//! no-op, which is what the tests rely on.
//!
//! # Example
//!
//! ```rust,no_run
//! use hotel_booking_runtime::metrics::MetricsExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut exporter = MetricsExporter::new();
//! exporter.install()?;
//! let body = exporter.render().unwrap_or_default();
//! # Ok(())
//! # }
//! ```

use hotel_booking_core::booking::BookingStatus;
use hotel_booking_core::BookingError;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installs the Prometheus recorder and renders the scrape payload.
#[derive(Default)]
pub struct MetricsExporter {
    handle: Option<PrometheusHandle>,
}

impl MetricsExporter {
    /// Create an exporter with no recorder installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the global Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed. A recorder that is already
    /// installed (e.g., by another test) is not an error.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this exporter did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!("bookings_created_total", "Total number of bookings created");
    describe_counter!(
        "bookings_rejected_total",
        "Total number of booking attempts rejected, by reason"
    );
    describe_histogram!(
        "booking_create_duration_seconds",
        "Time taken to create a booking"
    );
    describe_counter!(
        "booking_transitions_total",
        "Total number of booking status transitions, by target status"
    );
    describe_counter!(
        "confirmation_collisions_total",
        "Total number of generated confirmation numbers that were already taken"
    );
    describe_counter!("quotes_computed_total", "Total number of quotes computed");

    describe_counter!("retry_attempts_total", "Total number of retry attempts");
    describe_counter!("retry_exhausted_total", "Total number of operations that exhausted retries");
}

/// Booking metrics recorder.
pub struct BookingMetrics;

impl BookingMetrics {
    /// Record a created booking.
    pub fn record_created(status: BookingStatus, duration: Duration) {
        counter!("bookings_created_total", "status" => status.as_str()).increment(1);
        histogram!("booking_create_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a rejected booking attempt.
    pub fn record_rejected(error: &BookingError) {
        counter!("bookings_rejected_total", "reason" => error.kind()).increment(1);
    }

    /// Record a status transition.
    pub fn record_transition(to: BookingStatus) {
        counter!("booking_transitions_total", "to" => to.as_str()).increment(1);
    }

    /// Record a confirmation number collision.
    pub fn record_collision() {
        counter!("confirmation_collisions_total").increment(1);
    }

    /// Record a computed quote.
    pub fn record_quote() {
        counter!("quotes_computed_total").increment(1);
    }
}

/// Retry metrics recorder.
pub struct RetryMetrics;

impl RetryMetrics {
    /// Record a retry attempt.
    pub fn record_attempt() {
        counter!("retry_attempts_total").increment(1);
    }

    /// Record exhausted retries.
    pub fn record_exhausted() {
        counter!("retry_exhausted_total").increment(1);
    }
}
