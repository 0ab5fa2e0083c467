//! Persistence traits.
//!
//! The services in `hotel-booking-runtime` only see these traits. Two implementations exist:
//!
//! - `PostgresStore` (in `hotel-booking-postgres`): production storage with transactional
//!   inventory updates
//! - `InMemoryStore` (in `hotel-booking-runtime`): a single-lock store for tests and local runs
//!
//! # Inventory contract
//!
//! [`BookingStore::insert_booking`] must decrement `room.available` and insert the booking as one
//! atomic unit, refusing with [`StoreError::RoomUnavailable`] when no unit is left.
//! [`BookingStore::apply_transition`] must only apply when the booking still has
//! `transition.from` as its status, and must release the unit in the same unit of work when the
//! transition says so.

use crate::booking::{Booking, BookingFilter, BookingStatus, Transition};
use crate::catalog::{Hotel, HotelFilter, Room};
use crate::confirmation::ConfirmationNumber;
use crate::error::BookingError;
use crate::offer::Offer;
use crate::types::{BookingId, HotelId, OfferId, RoomId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced entity does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Identifier
        id: String,
    },

    /// The guarded decrement found no unit left
    #[error("Room {0} has no units available")]
    RoomUnavailable(RoomId),

    /// Another booking already holds this confirmation number
    #[error("Confirmation number {0} is already taken")]
    DuplicateConfirmation(ConfirmationNumber),

    /// The booking's status changed underneath the transition
    #[error("Booking {booking_id} is {actual}, cannot move to {requested}")]
    StatusConflict {
        /// Booking
        booking_id: BookingId,
        /// Status found in storage
        actual: BookingStatus,
        /// Status that was requested
        requested: BookingStatus,
    },

    /// Connection, query or transaction failure
    #[error("Database error: {0}")]
    Database(String),

    /// Stored data could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::RoomUnavailable(room_id) => Self::RoomUnavailable { room_id },
            StoreError::StatusConflict {
                actual, requested, ..
            } => Self::InvalidTransition {
                from: actual,
                to: requested,
            },
            StoreError::DuplicateConfirmation(_)
            | StoreError::Database(_)
            | StoreError::Serialization(_) => Self::Persistence(err.to_string()),
        }
    }
}

/// Hotels and rooms.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Loads a hotel
    async fn get_hotel(&self, id: HotelId) -> Result<Option<Hotel>, StoreError>;

    /// Lists hotels matching `filter`, ordered by name
    async fn list_hotels(&self, filter: &HotelFilter) -> Result<Vec<Hotel>, StoreError>;

    /// Inserts or replaces a hotel
    async fn save_hotel(&self, hotel: &Hotel) -> Result<(), StoreError>;

    /// Deletes a hotel with its rooms and offers. Returns `false` if it did not exist.
    async fn delete_hotel(&self, id: HotelId) -> Result<bool, StoreError>;

    /// Loads a room
    async fn get_room(&self, id: RoomId) -> Result<Option<Room>, StoreError>;

    /// Lists rooms, optionally of one hotel
    async fn list_rooms(&self, hotel_id: Option<HotelId>) -> Result<Vec<Room>, StoreError>;

    /// Inserts a room, or replaces the descriptive data of an existing one.
    ///
    /// An existing room keeps its stored `available` count; inventory only moves through
    /// bookings, transitions and [`adjust_room_inventory`](Self::adjust_room_inventory).
    /// Fails with `NotFound` if its hotel does not exist.
    async fn save_room(&self, room: &Room) -> Result<(), StoreError>;

    /// Adds `delta` units to a room's inventory in one atomic step and returns the new count.
    ///
    /// Returns `None` for an unknown room. Fails with [`StoreError::RoomUnavailable`] if the
    /// removal would take the count below zero.
    async fn adjust_room_inventory(&self, id: RoomId, delta: i32)
    -> Result<Option<u32>, StoreError>;
}

/// Discount offers.
#[async_trait]
pub trait OfferStore: Send + Sync {
    /// Inserts an offer
    async fn save_offer(&self, offer: &Offer) -> Result<(), StoreError>;

    /// Loads an offer
    async fn get_offer(&self, id: OfferId) -> Result<Option<Offer>, StoreError>;

    /// Offers scoped to `room` or to its hotel, live or not
    async fn offers_for_room(&self, room: &Room) -> Result<Vec<Offer>, StoreError>;
}

/// Bookings and the inventory they hold.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Whether a booking already uses `number`
    async fn confirmation_exists(&self, number: &ConfirmationNumber) -> Result<bool, StoreError>;

    /// Takes one unit of the booked room and inserts the booking, atomically.
    ///
    /// Fails with [`StoreError::RoomUnavailable`] if the room has no unit left and with
    /// [`StoreError::DuplicateConfirmation`] if the confirmation number is taken. Neither
    /// failure leaves a trace.
    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError>;

    /// Loads a booking
    async fn get_booking(&self, id: BookingId) -> Result<Option<Booking>, StoreError>;

    /// Loads a booking by its confirmation number
    async fn find_by_confirmation(
        &self,
        number: &ConfirmationNumber,
    ) -> Result<Option<Booking>, StoreError>;

    /// Lists bookings matching `filter`, newest first
    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError>;

    /// Applies a planned status change, guarded on `transition.from`.
    ///
    /// Fails with [`StoreError::StatusConflict`] if the stored status is no longer
    /// `transition.from`.
    async fn apply_transition(
        &self,
        transition: &Transition,
        at: DateTime<Utc>,
    ) -> Result<Booking, StoreError>;
}
