//! # Hotel Booking Testing
//!
//! Testing utilities for the hotel booking workspace.
//!
//! This crate provides:
//! - Mock implementations of the environment traits (clock, activity logger, confirmation
//!   numbers)
//! - A re-export of [`InMemoryStore`] with its failure-injection hooks enabled
//! - Fixture builders for hotels, rooms, offers and booking requests
//! - A [`BookingHarness`] wiring the services to the doubles
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use hotel_booking_testing::{BookingHarness, fixtures};
//!
//! #[tokio::test]
//! async fn test_booking_flow() {
//!     let harness = BookingHarness::new();
//!     let (_, room) = harness.seed_room(10_000, 1).await;
//!
//!     let booking = harness
//!         .bookings
//!         .create_booking(fixtures::booking_request(&room, harness.today(), 3))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(harness.store.room_available(room.id), Some(0));
//! }
//! ```

use chrono::{DateTime, Utc};
use hotel_booking_core::environment::Clock;

pub mod fixtures;
pub mod harness;

pub use harness::BookingHarness;
pub use hotel_booking_runtime::InMemoryStore;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use async_trait::async_trait;
    use hotel_booking_core::activity::{ActivityEvent, ActivityLogError, ActivityLogger};
    use hotel_booking_core::confirmation::{
        ConfirmationNumber, ConfirmationNumberGenerator, RandomConfirmationGenerator,
    };
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use hotel_booking_testing::mocks::FixedClock;
    /// use hotel_booking_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 09:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which never happens in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T09:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Activity logger that keeps every event for assertions.
    #[derive(Clone, Debug, Default)]
    pub struct RecordingActivityLogger {
        events: Arc<Mutex<Vec<ActivityEvent>>>,
    }

    impl RecordingActivityLogger {
        /// Create an empty logger
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Events recorded so far
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn events(&self) -> Vec<ActivityEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ActivityLogger for RecordingActivityLogger {
        async fn log(&self, event: &ActivityEvent) -> Result<(), ActivityLogError> {
            self.events
                .lock()
                .map_err(|e| ActivityLogError(e.to_string()))?
                .push(event.clone());
            Ok(())
        }
    }

    /// Activity logger that always fails.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct FailingActivityLogger;

    #[async_trait]
    impl ActivityLogger for FailingActivityLogger {
        async fn log(&self, _event: &ActivityEvent) -> Result<(), ActivityLogError> {
            Err(ActivityLogError("audit trail unavailable".to_string()))
        }
    }

    /// Confirmation generator replaying a script, then falling back to random numbers.
    ///
    /// Scripting the same number twice forces a collision.
    #[derive(Clone, Debug, Default)]
    pub struct SequenceConfirmationGenerator {
        script: Arc<Mutex<VecDeque<ConfirmationNumber>>>,
    }

    impl SequenceConfirmationGenerator {
        /// Create a generator replaying `numbers` in order
        #[must_use]
        pub fn new(numbers: impl IntoIterator<Item = ConfirmationNumber>) -> Self {
            Self {
                script: Arc::new(Mutex::new(numbers.into_iter().collect())),
            }
        }

        /// Create a generator that returns `number` `times` times before going random
        #[must_use]
        pub fn repeating(number: &ConfirmationNumber, times: usize) -> Self {
            Self::new(std::iter::repeat_n(number.clone(), times))
        }
    }

    impl ConfirmationNumberGenerator for SequenceConfirmationGenerator {
        fn generate(&self) -> ConfirmationNumber {
            let scripted = self
                .script
                .lock()
                .ok()
                .and_then(|mut script| script.pop_front());
            scripted.unwrap_or_else(|| RandomConfirmationGenerator.generate())
        }
    }
}

/// Property-based testing utilities
pub mod properties {
    use hotel_booking_core::offer::Discount;
    use hotel_booking_core::{CurrencyCode, Money, Percentage, Price};
    use proptest::prelude::*;

    /// Positive nightly rates up to 10,000.00
    pub fn nightly_rate() -> impl Strategy<Value = Money> {
        (1u64..=1_000_000).prop_map(Money::from_cents)
    }

    /// Valid discounts in `currency`: 0.01%..=100% or a positive fixed amount
    pub fn discount(currency: CurrencyCode) -> impl Strategy<Value = Discount> {
        prop_oneof![
            (1u32..=Percentage::SCALE).prop_map(|bp| Discount::Percentage {
                value: Percentage::from_basis_points(bp),
            }),
            (1u64..=10_000_000).prop_map(move |cents| Discount::Fixed {
                value: Price::new(Money::from_cents(cents), currency.clone()),
            }),
        ]
    }

    /// Stay lengths in nights
    pub fn nights() -> impl Strategy<Value = u32> {
        1u32..=30
    }
}

// Re-export commonly used items
pub use mocks::{
    FailingActivityLogger, FixedClock, RecordingActivityLogger, SequenceConfirmationGenerator,
    test_clock,
};
