//! # Hotel Booking Runtime
//!
//! The imperative shell around `hotel-booking-core`.
//!
//! The core decides; this crate loads data, calls the pure functions, persists the outcome and
//! reports it. All collaborators arrive through a [`BookingEnvironment`], so the same services
//! run against PostgreSQL in production and against in-memory doubles in tests.
//!
//! ## Core Components
//!
//! - **`CatalogService`**: hotel, room and offer reads and admin writes
//! - **`BookingService`**: quotes, booking creation, status transitions
//! - **`InMemoryStore`**: every store trait behind one lock, for local runs and tests
//! - **Retry**: bounded exponential backoff for transient failures
//! - **Metrics**: Prometheus counters and histograms for the booking flow
//!
//! ## Example
//!
//! ```ignore
//! use hotel_booking_runtime::{BookingConfig, BookingEnvironment, BookingService};
//!
//! let env = BookingEnvironment::new(store.clone(), store.clone(), store, clock);
//! let service = BookingService::new(env, BookingConfig::default());
//!
//! let booking = service.create_booking(request).await?;
//! println!("confirmation {}", booking.confirmation_number);
//! ```

use hotel_booking_core::activity::{ActivityEvent, ActivityLogger};
use hotel_booking_core::confirmation::{ConfirmationNumberGenerator, RandomConfirmationGenerator};
use hotel_booking_core::environment::Clock;
use hotel_booking_core::store::{BookingStore, CatalogStore, OfferStore};
use std::sync::Arc;

/// Activity logger writing to the tracing pipeline
pub mod activity;

/// Booking lifecycle orchestration
pub mod booking;

/// Catalog and offer administration
pub mod catalog;

/// Single-lock in-memory storage
pub mod memory;

/// Prometheus metrics for observability
pub mod metrics;

/// Retry logic with exponential backoff
pub mod retry;

pub use activity::TracingActivityLogger;
pub use booking::{BookingConfig, BookingService, QuoteRequest};
pub use catalog::CatalogService;
pub use memory::InMemoryStore;

/// Injected collaborators shared by the services.
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Hotels and rooms
    pub catalog: Arc<dyn CatalogStore>,
    /// Offers
    pub offers: Arc<dyn OfferStore>,
    /// Bookings and inventory
    pub bookings: Arc<dyn BookingStore>,
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Audit trail
    pub activity: Arc<dyn ActivityLogger>,
    /// Confirmation number source
    pub confirmations: Arc<dyn ConfirmationNumberGenerator>,
}

impl BookingEnvironment {
    /// Creates an environment with the tracing activity logger and random confirmation numbers.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        offers: Arc<dyn OfferStore>,
        bookings: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            offers,
            bookings,
            clock,
            activity: Arc::new(TracingActivityLogger),
            confirmations: Arc::new(RandomConfirmationGenerator),
        }
    }

    /// Replaces the activity logger.
    #[must_use]
    pub fn with_activity_logger(mut self, activity: Arc<dyn ActivityLogger>) -> Self {
        self.activity = activity;
        self
    }

    /// Replaces the confirmation number generator.
    #[must_use]
    pub fn with_confirmation_generator(
        mut self,
        confirmations: Arc<dyn ConfirmationNumberGenerator>,
    ) -> Self {
        self.confirmations = confirmations;
        self
    }

    /// Records an activity event. Failures are logged and swallowed.
    pub(crate) async fn record_activity(&self, event: ActivityEvent) {
        if let Err(error) = self.activity.log(&event).await {
            tracing::warn!(
                booking_id = %event.booking_id,
                action = %event.action,
                error = %error,
                "Failed to record activity event"
            );
        }
    }
}
