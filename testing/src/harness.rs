//! Services wired to in-memory doubles.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use crate::fixtures;
use crate::mocks::{FixedClock, RecordingActivityLogger, test_clock};
use chrono::NaiveDate;
use hotel_booking_core::catalog::{Hotel, Room};
use hotel_booking_core::confirmation::ConfirmationNumberGenerator;
use hotel_booking_core::environment::Clock;
use hotel_booking_core::offer::{Discount, Offer, OfferScope};
use hotel_booking_runtime::{
    BookingConfig, BookingEnvironment, BookingService, CatalogService, InMemoryStore,
};
use std::sync::Arc;

/// Catalog and booking services over one [`InMemoryStore`], a fixed clock and a recording
/// activity logger.
#[derive(Clone)]
pub struct BookingHarness {
    /// Shared store
    pub store: InMemoryStore,
    /// Fixed clock
    pub clock: FixedClock,
    /// Recorded activity events
    pub activity: RecordingActivityLogger,
    /// Environment the services run in
    pub env: BookingEnvironment,
    /// Catalog service
    pub catalog: CatalogService,
    /// Booking service
    pub bookings: BookingService,
}

impl Default for BookingHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingHarness {
    /// Harness with the default booking configuration and [`test_clock`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BookingConfig::default())
    }

    /// Harness with a custom booking configuration
    #[must_use]
    pub fn with_config(config: BookingConfig) -> Self {
        Self::build(InMemoryStore::new(), test_clock(), config, None)
    }

    /// Harness sharing this harness's store but running at another time
    #[must_use]
    pub fn at(&self, clock: FixedClock) -> Self {
        Self::build(
            self.store.clone(),
            clock,
            self.bookings.config().clone(),
            Some(self.activity.clone()),
        )
    }

    /// Same harness with a scripted confirmation number generator
    #[must_use]
    pub fn with_confirmations(mut self, generator: Arc<dyn ConfirmationNumberGenerator>) -> Self {
        self.env = self.env.with_confirmation_generator(generator);
        self.catalog = CatalogService::new(self.env.clone());
        self.bookings = BookingService::new(self.env.clone(), self.bookings.config().clone());
        self
    }

    fn build(
        store: InMemoryStore,
        clock: FixedClock,
        config: BookingConfig,
        activity: Option<RecordingActivityLogger>,
    ) -> Self {
        let activity = activity.unwrap_or_default();
        let shared = Arc::new(store.clone());
        let env = BookingEnvironment::new(
            shared.clone(),
            shared.clone(),
            shared,
            Arc::new(clock.clone()),
        )
        .with_activity_logger(Arc::new(activity.clone()));

        Self {
            catalog: CatalogService::new(env.clone()),
            bookings: BookingService::new(env.clone(), config),
            store,
            clock,
            activity,
            env,
        }
    }

    /// The clock's current date
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Saves a hotel and one room with the given nightly rate and inventory
    pub async fn seed_room(&self, price_cents: u64, available: u32) -> (Hotel, Room) {
        let hotel = self
            .catalog
            .save_hotel(fixtures::hotel(self.clock.now()))
            .await
            .unwrap();
        let room = self
            .catalog
            .save_room(fixtures::room(&hotel, price_cents, available))
            .await
            .unwrap();
        (hotel, room)
    }

    /// Creates an offer scoped to `room`
    pub async fn seed_room_offer(&self, room: &Room, discount: Discount) -> Offer {
        self.catalog
            .create_offer(fixtures::offer(
                OfferScope::Room(room.id),
                discount,
                self.clock.now(),
            ))
            .await
            .unwrap()
    }
}
