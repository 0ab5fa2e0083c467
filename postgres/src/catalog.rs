//! Hotels, rooms and offers.

use crate::PostgresStore;
use crate::rows::{self, database};
use async_trait::async_trait;
use hotel_booking_core::catalog::{Hotel, HotelFilter, Room};
use hotel_booking_core::offer::{Offer, OfferScope};
use hotel_booking_core::store::{CatalogStore, OfferStore, StoreError};
use hotel_booking_core::{HotelId, OfferId, RoomId};
use sqlx::Row;
use uuid::Uuid;

#[async_trait]
impl CatalogStore for PostgresStore {
    async fn get_hotel(&self, id: HotelId) -> Result<Option<Hotel>, StoreError> {
        sqlx::query("SELECT data FROM hotels WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(database("Failed to load hotel"))?
            .map(|row| rows::document(&row))
            .transpose()
    }

    async fn list_hotels(&self, filter: &HotelFilter) -> Result<Vec<Hotel>, StoreError> {
        let records = sqlx::query(
            r"
            SELECT data FROM hotels
            WHERE ($1::BOOLEAN IS NULL OR published = $1)
              AND ($2::TEXT IS NULL OR LOWER(category) = LOWER($2))
            ORDER BY name_en, id
            ",
        )
        .bind(filter.published)
        .bind(filter.category.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(database("Failed to list hotels"))?;

        let mut hotels = Vec::with_capacity(records.len());
        for row in &records {
            let hotel: Hotel = rows::document(row)?;
            // The language filter looks inside the translations.
            if filter.matches(&hotel) {
                hotels.push(hotel);
            }
        }
        Ok(hotels)
    }

    async fn save_hotel(&self, hotel: &Hotel) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO hotels (id, name_en, category, published, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET name_en = EXCLUDED.name_en,
                category = EXCLUDED.category,
                published = EXCLUDED.published,
                data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(*hotel.id.as_uuid())
        .bind(&hotel.name.en)
        .bind(hotel.category.as_deref())
        .bind(hotel.published)
        .bind(rows::json(hotel)?)
        .bind(hotel.created_at)
        .bind(hotel.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database("Failed to save hotel"))?;
        Ok(())
    }

    async fn delete_hotel(&self, id: HotelId) -> Result<bool, StoreError> {
        // Rooms and offers go with the hotel through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(database("Failed to delete hotel"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_room(&self, id: RoomId) -> Result<Option<Room>, StoreError> {
        sqlx::query("SELECT data, available FROM rooms WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(database("Failed to load room"))?
            .map(|row| rows::room(&row))
            .transpose()
    }

    async fn list_rooms(&self, hotel_id: Option<HotelId>) -> Result<Vec<Room>, StoreError> {
        let records = sqlx::query(
            r"
            SELECT data, available FROM rooms
            WHERE ($1::UUID IS NULL OR hotel_id = $1)
            ORDER BY price_cents, id
            ",
        )
        .bind(hotel_id.map(|id| *id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(database("Failed to list rooms"))?;

        records.iter().map(rows::room).collect()
    }

    async fn save_room(&self, room: &Room) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO rooms (id, hotel_id, price_cents, available, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET hotel_id = EXCLUDED.hotel_id,
                price_cents = EXCLUDED.price_cents,
                data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(*room.id.as_uuid())
        .bind(*room.hotel_id.as_uuid())
        .bind(rows::cents(room.price.amount)?)
        .bind(rows::units(room.available)?)
        .bind(rows::json(room)?)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if rows::is_foreign_key_violation(&e) {
                return StoreError::NotFound {
                    entity: "Hotel",
                    id: room.hotel_id.to_string(),
                };
            }
            StoreError::Database(format!("Failed to save room: {e}"))
        })?;
        Ok(())
    }

    async fn adjust_room_inventory(
        &self,
        id: RoomId,
        delta: i32,
    ) -> Result<Option<u32>, StoreError> {
        let record = sqlx::query(
            r"
            UPDATE rooms SET available = available + $2
            WHERE id = $1 AND available + $2 >= 0
            RETURNING available
            ",
        )
        .bind(*id.as_uuid())
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(database("Failed to adjust room inventory"))?;

        if let Some(row) = record {
            let available: i32 = row
                .try_get("available")
                .map_err(database("Failed to read room inventory"))?;
            return Ok(Some(rows::from_units(available)?));
        }

        // No row: either the room is missing or the withdrawal would go negative.
        let exists: Option<i32> = sqlx::query_scalar("SELECT available FROM rooms WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(database("Failed to load room inventory"))?;
        match exists {
            Some(_) => Err(StoreError::RoomUnavailable(id)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OfferStore for PostgresStore {
    async fn save_offer(&self, offer: &Offer) -> Result<(), StoreError> {
        let (room_id, hotel_id): (Option<Uuid>, Option<Uuid>) = match offer.scope {
            OfferScope::Room(id) => (Some(*id.as_uuid()), None),
            OfferScope::Hotel(id) => (None, Some(*id.as_uuid())),
        };

        sqlx::query(
            r"
            INSERT INTO offers (id, room_id, hotel_id, data, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET room_id = EXCLUDED.room_id,
                hotel_id = EXCLUDED.hotel_id,
                data = EXCLUDED.data
            ",
        )
        .bind(*offer.id.as_uuid())
        .bind(room_id)
        .bind(hotel_id)
        .bind(rows::json(offer)?)
        .bind(offer.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if rows::is_foreign_key_violation(&e) {
                let (entity, id) = match offer.scope {
                    OfferScope::Room(id) => ("Room", id.to_string()),
                    OfferScope::Hotel(id) => ("Hotel", id.to_string()),
                };
                return StoreError::NotFound { entity, id };
            }
            StoreError::Database(format!("Failed to save offer: {e}"))
        })?;
        Ok(())
    }

    async fn get_offer(&self, id: OfferId) -> Result<Option<Offer>, StoreError> {
        sqlx::query("SELECT data FROM offers WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(database("Failed to load offer"))?
            .map(|row| rows::document(&row))
            .transpose()
    }

    async fn offers_for_room(&self, room: &Room) -> Result<Vec<Offer>, StoreError> {
        let records = sqlx::query(
            r"
            SELECT data FROM offers
            WHERE room_id = $1 OR hotel_id = $2
            ORDER BY id
            ",
        )
        .bind(*room.id.as_uuid())
        .bind(*room.hotel_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(database("Failed to load offers"))?;

        records.iter().map(rows::document).collect()
    }
}
