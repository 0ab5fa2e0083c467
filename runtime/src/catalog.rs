use crate::BookingEnvironment;
use hotel_booking_core::catalog::{Hotel, HotelFilter, Room};
use hotel_booking_core::offer::{Discount, Offer, OfferScope};
use hotel_booking_core::{BookingError, BookingResult, HotelId, RoomId, ValidationError};

/// Catalog reads for the public pages and validated writes for the admin dashboard.
#[derive(Clone)]
pub struct CatalogService {
    env: BookingEnvironment,
}

impl CatalogService {
    /// Creates the service
    #[must_use]
    pub const fn new(env: BookingEnvironment) -> Self {
        Self { env }
    }

    /// Loads a hotel.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if the hotel does not exist.
    pub async fn get_hotel(&self, id: HotelId) -> BookingResult<Hotel> {
        self.env
            .catalog
            .get_hotel(id)
            .await?
            .ok_or_else(|| BookingError::not_found("Hotel", id))
    }

    /// Lists hotels matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on storage failure.
    pub async fn list_hotels(&self, filter: &HotelFilter) -> BookingResult<Vec<Hotel>> {
        Ok(self.env.catalog.list_hotels(filter).await?)
    }

    /// Loads a room.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if the room does not exist.
    pub async fn get_room(&self, id: RoomId) -> BookingResult<Room> {
        self.env
            .catalog
            .get_room(id)
            .await?
            .ok_or_else(|| BookingError::not_found("Room", id))
    }

    /// Lists rooms, optionally of one hotel.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if `hotel_id` names an unknown hotel.
    pub async fn list_rooms(&self, hotel_id: Option<HotelId>) -> BookingResult<Vec<Room>> {
        if let Some(id) = hotel_id {
            self.get_hotel(id).await?;
        }
        Ok(self.env.catalog.list_rooms(hotel_id).await?)
    }

    /// Creates or updates a hotel.
    ///
    /// Publishing (draft → published) requires complete English and Arabic content and stamps
    /// `published_at`; unpublishing clears it. `created_at` is kept from the stored hotel.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] when the hotel is invalid.
    #[tracing::instrument(skip(self, hotel), fields(hotel_id = %hotel.id))]
    pub async fn save_hotel(&self, mut hotel: Hotel) -> BookingResult<Hotel> {
        let now = self.env.clock.now();
        let existing = self.env.catalog.get_hotel(hotel.id).await?;

        let requested = hotel.published;
        match &existing {
            Some(stored) => {
                hotel.created_at = stored.created_at;
                hotel.published = stored.published;
                hotel.published_at = stored.published_at;
            }
            None => {
                hotel.created_at = now;
                hotel.published = false;
                hotel.published_at = None;
            }
        }
        hotel.set_published(requested, now)?;
        hotel.validate()?;

        self.env.catalog.save_hotel(&hotel).await?;
        tracing::info!(published = hotel.published, "Hotel saved");
        Ok(hotel)
    }

    /// Deletes a hotel together with its rooms and offers.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if the hotel does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete_hotel(&self, id: HotelId) -> BookingResult<()> {
        if !self.env.catalog.delete_hotel(id).await? {
            return Err(BookingError::not_found("Hotel", id));
        }
        tracing::info!("Hotel deleted");
        Ok(())
    }

    /// Creates or updates a room.
    ///
    /// `available` is only taken from `room` when the room is new. Updates leave the stored
    /// count alone so bookings made since the caller read the room are not undone; use
    /// [`adjust_room_inventory`](Self::adjust_room_inventory) to change it.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown hotel and [`BookingError::Validation`]
    /// for invalid room data.
    #[tracing::instrument(skip(self, room), fields(room_id = %room.id, hotel_id = %room.hotel_id))]
    pub async fn save_room(&self, mut room: Room) -> BookingResult<Room> {
        room.validate()?;
        self.get_hotel(room.hotel_id).await?;

        let now = self.env.clock.now();
        room.created_at = match self.env.catalog.get_room(room.id).await? {
            Some(stored) => stored.created_at,
            None => now,
        };
        room.updated_at = now;

        self.env.catalog.save_room(&room).await?;
        let saved = self.get_room(room.id).await?;
        tracing::info!(available = saved.available, "Room saved");
        Ok(saved)
    }

    /// Adds (positive `delta`) or withdraws (negative `delta`) sellable units of a room.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown room and
    /// [`BookingError::RoomUnavailable`] when more units would be withdrawn than are available.
    #[tracing::instrument(skip(self))]
    pub async fn adjust_room_inventory(&self, id: RoomId, delta: i32) -> BookingResult<u32> {
        let available = self
            .env
            .catalog
            .adjust_room_inventory(id, delta)
            .await?
            .ok_or_else(|| BookingError::not_found("Room", id))?;
        tracing::info!(available, "Room inventory adjusted");
        Ok(available)
    }

    /// Creates an offer after validating it and its target.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] for an invalid offer (e.g. a percentage above 100)
    /// and [`BookingError::NotFound`] if the scoped room or hotel does not exist.
    #[tracing::instrument(skip(self, offer), fields(offer_id = %offer.id))]
    pub async fn create_offer(&self, mut offer: Offer) -> BookingResult<Offer> {
        offer.validate()?;

        match offer.scope {
            OfferScope::Room(room_id) => {
                let room = self.get_room(room_id).await?;
                if let Discount::Fixed { value } = &offer.discount {
                    if value.currency != room.price.currency {
                        return Err(ValidationError::InvalidOffer(format!(
                            "fixed discount in {} cannot apply to a room priced in {}",
                            value.currency, room.price.currency
                        ))
                        .into());
                    }
                }
            }
            OfferScope::Hotel(hotel_id) => {
                self.get_hotel(hotel_id).await?;
            }
        }

        offer.created_at = self.env.clock.now();
        self.env.offers.save_offer(&offer).await?;
        tracing::info!(scope = ?offer.scope, "Offer created");
        Ok(offer)
    }
}
