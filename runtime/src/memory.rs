//! In-memory implementation of every store trait.
//!
//! All state sits behind one mutex, so each operation (including the inventory check, decrement
//! and booking insert) is atomic with respect to every other operation. Fast and deterministic
//! for tests; also used by the server when `STORAGE=memory`.
//!
//! The `test-util` feature adds failure injection for booking inserts.

use async_trait::async_trait;
use hotel_booking_core::booking::{Booking, BookingFilter, InventoryEffect, Transition};
use hotel_booking_core::catalog::{Hotel, HotelFilter, Room};
use hotel_booking_core::confirmation::ConfirmationNumber;
use hotel_booking_core::offer::{Offer, OfferScope};
use hotel_booking_core::store::{BookingStore, CatalogStore, OfferStore, StoreError};
use hotel_booking_core::{BookingId, DateTime, HotelId, OfferId, RoomId, Utc};
use std::collections::HashMap;
#[cfg(feature = "test-util")]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    hotels: HashMap<HotelId, Hotel>,
    rooms: HashMap<RoomId, Room>,
    offers: HashMap<OfferId, Offer>,
    bookings: HashMap<BookingId, Booking>,
    confirmations: HashMap<ConfirmationNumber, BookingId>,
}

/// Single-lock store for hotels, rooms, offers and bookings.
///
/// Cloning shares the underlying state.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    #[cfg(feature = "test-util")]
    failing_inserts: Arc<AtomicUsize>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|e| StoreError::Database(format!("store lock poisoned: {e}")))
    }

    /// Make the next `count` booking inserts fail with a database error.
    #[cfg(feature = "test-util")]
    pub fn fail_next_booking_inserts(&self, count: usize) {
        self.failing_inserts.store(count, Ordering::SeqCst);
    }

    /// Units currently available for a room
    #[must_use]
    pub fn room_available(&self, id: RoomId) -> Option<u32> {
        self.lock().ok()?.rooms.get(&id).map(|room| room.available)
    }

    /// Number of stored bookings
    #[must_use]
    pub fn booking_count(&self) -> usize {
        self.lock().map(|state| state.bookings.len()).unwrap_or(0)
    }

    #[cfg(feature = "test-util")]
    fn take_injected_failure(&self) -> bool {
        self.failing_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    #[cfg(not(feature = "test-util"))]
    #[allow(clippy::unused_self)]
    fn take_injected_failure(&self) -> bool {
        false
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn get_hotel(&self, id: HotelId) -> Result<Option<Hotel>, StoreError> {
        Ok(self.lock()?.hotels.get(&id).cloned())
    }

    async fn list_hotels(&self, filter: &HotelFilter) -> Result<Vec<Hotel>, StoreError> {
        let mut hotels: Vec<Hotel> = self
            .lock()?
            .hotels
            .values()
            .filter(|hotel| filter.matches(hotel))
            .cloned()
            .collect();
        hotels.sort_by(|a, b| a.name.en.cmp(&b.name.en).then(a.id.cmp(&b.id)));
        Ok(hotels)
    }

    async fn save_hotel(&self, hotel: &Hotel) -> Result<(), StoreError> {
        self.lock()?.hotels.insert(hotel.id, hotel.clone());
        Ok(())
    }

    async fn delete_hotel(&self, id: HotelId) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        if state.hotels.remove(&id).is_none() {
            return Ok(false);
        }

        let room_ids: Vec<RoomId> = state
            .rooms
            .values()
            .filter(|room| room.hotel_id == id)
            .map(|room| room.id)
            .collect();
        state.rooms.retain(|_, room| room.hotel_id != id);
        state.offers.retain(|_, offer| match offer.scope {
            OfferScope::Hotel(hotel_id) => hotel_id != id,
            OfferScope::Room(room_id) => !room_ids.contains(&room_id),
        });
        Ok(true)
    }

    async fn get_room(&self, id: RoomId) -> Result<Option<Room>, StoreError> {
        Ok(self.lock()?.rooms.get(&id).cloned())
    }

    async fn list_rooms(&self, hotel_id: Option<HotelId>) -> Result<Vec<Room>, StoreError> {
        let mut rooms: Vec<Room> = self
            .lock()?
            .rooms
            .values()
            .filter(|room| hotel_id.is_none_or(|id| room.hotel_id == id))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| a.price.amount.cmp(&b.price.amount).then(a.id.cmp(&b.id)));
        Ok(rooms)
    }

    async fn save_room(&self, room: &Room) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if !state.hotels.contains_key(&room.hotel_id) {
            return Err(StoreError::NotFound {
                entity: "Hotel",
                id: room.hotel_id.to_string(),
            });
        }
        let mut room = room.clone();
        if let Some(stored) = state.rooms.get(&room.id) {
            room.available = stored.available;
        }
        state.rooms.insert(room.id, room);
        Ok(())
    }

    async fn adjust_room_inventory(
        &self,
        id: RoomId,
        delta: i32,
    ) -> Result<Option<u32>, StoreError> {
        let mut state = self.lock()?;
        let Some(room) = state.rooms.get_mut(&id) else {
            return Ok(None);
        };
        let adjusted = room
            .available
            .checked_add_signed(delta)
            .ok_or(StoreError::RoomUnavailable(id))?;
        room.available = adjusted;
        Ok(Some(adjusted))
    }
}

#[async_trait]
impl OfferStore for InMemoryStore {
    async fn save_offer(&self, offer: &Offer) -> Result<(), StoreError> {
        self.lock()?.offers.insert(offer.id, offer.clone());
        Ok(())
    }

    async fn get_offer(&self, id: OfferId) -> Result<Option<Offer>, StoreError> {
        Ok(self.lock()?.offers.get(&id).cloned())
    }

    async fn offers_for_room(&self, room: &Room) -> Result<Vec<Offer>, StoreError> {
        let mut offers: Vec<Offer> = self
            .lock()?
            .offers
            .values()
            .filter(|offer| offer.scope.targets(room))
            .cloned()
            .collect();
        offers.sort_by_key(|offer| offer.id);
        Ok(offers)
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn confirmation_exists(&self, number: &ConfirmationNumber) -> Result<bool, StoreError> {
        Ok(self.lock()?.confirmations.contains_key(number))
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        if self.take_injected_failure() {
            return Err(StoreError::Database("injected insert failure".to_string()));
        }

        let mut state = self.lock()?;

        if state.confirmations.contains_key(&booking.confirmation_number) {
            return Err(StoreError::DuplicateConfirmation(
                booking.confirmation_number.clone(),
            ));
        }

        let room = state
            .rooms
            .get_mut(&booking.room_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Room",
                id: booking.room_id.to_string(),
            })?;
        room.available = room
            .available
            .checked_sub(1)
            .ok_or(StoreError::RoomUnavailable(booking.room_id))?;

        state
            .confirmations
            .insert(booking.confirmation_number.clone(), booking.id);
        state.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self.lock()?.bookings.get(&id).cloned())
    }

    async fn find_by_confirmation(
        &self,
        number: &ConfirmationNumber,
    ) -> Result<Option<Booking>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .confirmations
            .get(number)
            .and_then(|id| state.bookings.get(id))
            .cloned())
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let mut bookings: Vec<Booking> = self
            .lock()?
            .bookings
            .values()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(bookings)
    }

    async fn apply_transition(
        &self,
        transition: &Transition,
        at: DateTime<Utc>,
    ) -> Result<Booking, StoreError> {
        let mut state = self.lock()?;

        let booking = state
            .bookings
            .get_mut(&transition.booking_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Booking",
                id: transition.booking_id.to_string(),
            })?;
        if booking.status != transition.from {
            return Err(StoreError::StatusConflict {
                booking_id: booking.id,
                actual: booking.status,
                requested: transition.to,
            });
        }
        booking.status = transition.to;
        booking.updated_at = at;
        let updated = booking.clone();

        if transition.inventory == InventoryEffect::Release {
            // The room may have been deleted with its hotel; nothing to give back then.
            if let Some(room) = state.rooms.get_mut(&transition.room_id) {
                room.available = room.available.saturating_add(1);
            }
        }

        Ok(updated)
    }
}
