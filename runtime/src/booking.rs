use crate::BookingEnvironment;
use crate::metrics::BookingMetrics;
use hotel_booking_core::activity::ActivityEvent;
use hotel_booking_core::booking::{
    self, Booking, BookingFilter, BookingRequest, BookingStatus, InventoryEffect,
};
use hotel_booking_core::catalog::Room;
use hotel_booking_core::confirmation::ConfirmationNumber;
use hotel_booking_core::offer;
use hotel_booking_core::pricing::{self, Quote};
use hotel_booking_core::store::StoreError;
use hotel_booking_core::{
    AddOnId, BookingError, BookingId, BookingResult, NaiveDate, RoomId, StayDates, UserId,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default number of confirmation numbers tried before giving up
pub const DEFAULT_CONFIRMATION_ATTEMPTS: u32 = 5;

/// Booking flow settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingConfig {
    /// Create bookings as `confirmed` instead of `pending`
    pub auto_confirm: bool,
    /// Confirmation numbers tried per booking
    pub confirmation_max_attempts: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            auto_confirm: false,
            confirmation_max_attempts: DEFAULT_CONFIRMATION_ATTEMPTS,
        }
    }
}

impl BookingConfig {
    /// Set whether new bookings skip the pending state
    #[must_use]
    pub const fn with_auto_confirm(mut self, auto_confirm: bool) -> Self {
        self.auto_confirm = auto_confirm;
        self
    }

    /// Set the confirmation number attempt bound (at least 1)
    #[must_use]
    pub fn with_confirmation_max_attempts(mut self, attempts: u32) -> Self {
        self.confirmation_max_attempts = attempts.max(1);
        self
    }

    /// Status given to new bookings
    #[must_use]
    pub const fn initial_status(&self) -> BookingStatus {
        if self.auto_confirm {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        }
    }
}

/// Inputs of a read-only price quote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Room to price
    pub room_id: RoomId,
    /// Arrival
    pub check_in: NaiveDate,
    /// Departure
    pub check_out: NaiveDate,
    /// Number of guests
    pub guests: u32,
    /// Selected add-ons
    #[serde(default)]
    pub add_on_ids: Vec<AddOnId>,
}

/// Quotes, creates and transitions bookings.
#[derive(Clone)]
pub struct BookingService {
    env: BookingEnvironment,
    config: BookingConfig,
}

impl BookingService {
    /// Creates the service
    #[must_use]
    pub const fn new(env: BookingEnvironment, config: BookingConfig) -> Self {
        Self { env, config }
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &BookingConfig {
        &self.config
    }

    /// Today's date according to the environment clock
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.env.clock.today()
    }

    /// Prices a stay without side effects.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown room and [`BookingError::Validation`]
    /// for invalid dates, guest count, stay length or add-ons.
    #[tracing::instrument(skip(self, request), fields(room_id = %request.room_id))]
    pub async fn compute_quote(&self, request: &QuoteRequest) -> BookingResult<Quote> {
        let room = self.load_room(request.room_id).await?;
        let stay = booking::validate_stay(
            &room,
            request.check_in,
            request.check_out,
            request.guests,
            self.env.clock.today(),
        )?;
        let quote = self
            .price_stay(&room, &stay, request.guests, &request.add_on_ids)
            .await?;
        BookingMetrics::record_quote();
        Ok(quote)
    }

    async fn load_room(&self, room_id: RoomId) -> BookingResult<Room> {
        self.env
            .catalog
            .get_room(room_id)
            .await?
            .ok_or_else(|| BookingError::not_found("Room", room_id))
    }

    async fn price_stay(
        &self,
        room: &Room,
        stay: &StayDates,
        guests: u32,
        add_on_ids: &[AddOnId],
    ) -> BookingResult<Quote> {
        let add_ons = room.select_add_ons(add_on_ids)?;

        let offers = self.env.offers.offers_for_room(room).await?;
        let best = offer::resolve_best_offer(&offers, room, stay, guests, self.env.clock.now())?;
        let quote = pricing::compute_total(room, stay.nights(), &add_ons, best)?;

        tracing::debug!(
            nights = quote.nights,
            subtotal = %quote.subtotal,
            discount = %quote.discount_applied,
            total = %quote.total,
            offer_id = ?quote.offer_id.map(|id| id.to_string()),
            "Stay priced"
        );

        Ok(quote)
    }

    /// Books one unit of a room.
    ///
    /// Validates the request, prices it, allocates a unique confirmation number and stores the
    /// booking while taking one unit of inventory atomically.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`]: unknown room
    /// - [`BookingError::Validation`]: dates, guest count, stay length, add-ons, guest info
    /// - [`BookingError::RoomUnavailable`]: no unit left
    /// - [`BookingError::ConfirmationGenerationFailed`]: every candidate number was taken
    /// - [`BookingError::Persistence`]: storage failure, nothing was written
    #[tracing::instrument(
        skip(self, request),
        fields(room_id = %request.room_id, user_id = %request.user_id)
    )]
    pub async fn create_booking(&self, request: BookingRequest) -> BookingResult<Booking> {
        let started = Instant::now();
        match self.try_create_booking(request).await {
            Ok(booking) => {
                BookingMetrics::record_created(booking.status, started.elapsed());
                tracing::info!(
                    booking_id = %booking.id,
                    confirmation_number = %booking.confirmation_number,
                    status = %booking.status,
                    total = %booking.total_price,
                    "Booking created"
                );
                self.env
                    .record_activity(ActivityEvent::booking_created(&booking))
                    .await;
                Ok(booking)
            }
            Err(error) => {
                BookingMetrics::record_rejected(&error);
                tracing::info!(reason = error.kind(), error = %error, "Booking rejected");
                Err(error)
            }
        }
    }

    async fn try_create_booking(&self, request: BookingRequest) -> BookingResult<Booking> {
        let room = self.load_room(request.room_id).await?;
        let stay = booking::validate_stay(
            &room,
            request.check_in,
            request.check_out,
            request.guests,
            self.env.clock.today(),
        )?;

        // Fast path only: the store re-checks inside the atomic decrement.
        if room.available == 0 {
            return Err(BookingError::RoomUnavailable { room_id: room.id });
        }

        request.guest_info.validate()?;
        let quote = self
            .price_stay(&room, &stay, request.guests, &request.add_on_ids)
            .await?;

        let now = self.env.clock.now();
        let mut add_on_ids = Vec::with_capacity(request.add_on_ids.len());
        for id in request.add_on_ids {
            if !add_on_ids.contains(&id) {
                add_on_ids.push(id);
            }
        }

        let mut booking = Booking {
            id: BookingId::new(),
            confirmation_number: self.env.confirmations.generate(),
            user_id: request.user_id,
            hotel_id: room.hotel_id,
            room_id: room.id,
            offer_id: quote.offer_id,
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            guests: request.guests,
            guest_info: request.guest_info,
            add_on_ids,
            subtotal: quote.subtotal,
            add_on_total: quote.add_on_total,
            discount_applied: quote.discount_applied,
            total_price: quote.total,
            currency: quote.currency,
            status: self.config.initial_status(),
            created_at: now,
            updated_at: now,
        };

        self.insert_with_unique_confirmation(&mut booking).await?;
        Ok(booking)
    }

    async fn insert_with_unique_confirmation(&self, booking: &mut Booking) -> BookingResult<()> {
        let attempts = self.config.confirmation_max_attempts;

        for attempt in 1..=attempts {
            if attempt > 1 {
                booking.confirmation_number = self.env.confirmations.generate();
            }

            if self
                .env
                .bookings
                .confirmation_exists(&booking.confirmation_number)
                .await?
            {
                BookingMetrics::record_collision();
                tracing::debug!(
                    attempt,
                    confirmation_number = %booking.confirmation_number,
                    "Confirmation number taken, generating another"
                );
                continue;
            }

            match self.env.bookings.insert_booking(booking).await {
                Ok(()) => return Ok(()),
                Err(StoreError::DuplicateConfirmation(number)) => {
                    BookingMetrics::record_collision();
                    tracing::debug!(
                        attempt,
                        confirmation_number = %number,
                        "Confirmation number claimed concurrently, generating another"
                    );
                }
                Err(error) => return Err(error.into()),
            }
        }

        tracing::error!(attempts, "Could not allocate a unique confirmation number");
        Err(BookingError::ConfirmationGenerationFailed { attempts })
    }

    /// Moves a booking to `to`, releasing its unit on cancellation.
    ///
    /// `actor` is the admin performing the change, `None` for system actions.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`]: unknown booking
    /// - [`BookingError::InvalidTransition`]: no such edge, or another change won the race
    /// - [`BookingError::Validation`]: completing before check-out has passed
    #[tracing::instrument(skip(self))]
    pub async fn transition_booking(
        &self,
        actor: Option<UserId>,
        booking_id: BookingId,
        to: BookingStatus,
    ) -> BookingResult<Booking> {
        let current = self.get_booking(booking_id).await?;
        self.apply_transition(actor, &current, to, self.env.clock.today())
            .await
    }

    async fn apply_transition(
        &self,
        actor: Option<UserId>,
        current: &Booking,
        to: BookingStatus,
        today: NaiveDate,
    ) -> BookingResult<Booking> {
        let transition = booking::plan_transition(current, to, today)?;
        let updated = self
            .env
            .bookings
            .apply_transition(&transition, self.env.clock.now())
            .await?;

        BookingMetrics::record_transition(to);
        tracing::info!(
            booking_id = %updated.id,
            from = %transition.from,
            to = %updated.status,
            released = transition.inventory == InventoryEffect::Release,
            "Booking status changed"
        );
        self.env
            .record_activity(ActivityEvent::status_changed(actor, &updated, transition.from))
            .await;
        Ok(updated)
    }

    /// Completes every confirmed booking whose check-out date is before `today`.
    ///
    /// Bookings changed concurrently are skipped. Returns the completed bookings.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on storage failure.
    #[tracing::instrument(skip(self))]
    pub async fn complete_due_bookings(&self, today: NaiveDate) -> BookingResult<Vec<Booking>> {
        let confirmed = self
            .env
            .bookings
            .list_bookings(&BookingFilter {
                status: Some(BookingStatus::Confirmed),
                ..BookingFilter::default()
            })
            .await?;

        let mut completed = Vec::new();
        for candidate in confirmed.iter().filter(|b| b.check_out < today) {
            match self
                .apply_transition(None, candidate, BookingStatus::Completed, today)
                .await
            {
                Ok(booking) => completed.push(booking),
                Err(BookingError::InvalidTransition { from, .. }) => {
                    tracing::warn!(
                        booking_id = %candidate.id,
                        status = %from,
                        "Booking changed before it could be completed, skipping"
                    );
                }
                Err(error) => return Err(error),
            }
        }

        tracing::info!(count = completed.len(), "Completed due bookings");
        Ok(completed)
    }

    /// Loads a booking.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if the booking does not exist.
    pub async fn get_booking(&self, id: BookingId) -> BookingResult<Booking> {
        self.env
            .bookings
            .get_booking(id)
            .await?
            .ok_or_else(|| BookingError::not_found("Booking", id))
    }

    /// Loads a booking by its confirmation number.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if no booking has this number.
    pub async fn find_by_confirmation(
        &self,
        number: &ConfirmationNumber,
    ) -> BookingResult<Booking> {
        self.env
            .bookings
            .find_by_confirmation(number)
            .await?
            .ok_or_else(|| BookingError::not_found("Booking", number))
    }

    /// Lists bookings matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on storage failure.
    pub async fn list_bookings(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        Ok(self.env.bookings.list_bookings(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_follows_auto_confirm() {
        assert_eq!(BookingConfig::default().initial_status(), BookingStatus::Pending);
        assert_eq!(
            BookingConfig::default().with_auto_confirm(true).initial_status(),
            BookingStatus::Confirmed
        );
    }

    #[test]
    fn test_confirmation_attempts_at_least_one() {
        let config = BookingConfig::default().with_confirmation_max_attempts(0);
        assert_eq!(config.confirmation_max_attempts, 1);
    }
}
