//! Bookings and inventory.
//!
//! Inventory changes run in the same transaction as the booking row they belong to, so a
//! crash or a constraint violation between the two leaves neither behind.

use crate::PostgresStore;
use crate::rows::{self, database};
use async_trait::async_trait;
use hotel_booking_core::booking::{Booking, BookingFilter, InventoryEffect, Transition};
use hotel_booking_core::confirmation::ConfirmationNumber;
use hotel_booking_core::store::{BookingStore, StoreError};
use hotel_booking_core::{BookingId, DateTime, Utc};
use sqlx::Row;

#[async_trait]
impl BookingStore for PostgresStore {
    async fn confirmation_exists(&self, number: &ConfirmationNumber) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE confirmation_number = $1) AS taken",
        )
        .bind(number.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(database("Failed to check confirmation number"))?;

        row.try_get("taken")
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(database("Failed to start transaction"))?;

        let decremented = sqlx::query(
            "UPDATE rooms SET available = available - 1 WHERE id = $1 AND available > 0",
        )
        .bind(*booking.room_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(database("Failed to reserve inventory"))?;

        if decremented.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM rooms WHERE id = $1")
                .bind(*booking.room_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(database("Failed to load room"))?
                .is_some();
            // Dropping the transaction rolls it back.
            drop(tx);

            if !exists {
                return Err(StoreError::NotFound {
                    entity: "Room",
                    id: booking.room_id.to_string(),
                });
            }
            metrics::counter!("booking_store.inventory_exhausted_total").increment(1);
            return Err(StoreError::RoomUnavailable(booking.room_id));
        }

        let inserted = sqlx::query(
            r"
            INSERT INTO bookings
                (id, confirmation_number, user_id, room_id, status, check_out, data,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(*booking.id.as_uuid())
        .bind(booking.confirmation_number.as_str())
        .bind(*booking.user_id.as_uuid())
        .bind(*booking.room_id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.check_out)
        .bind(rows::json(booking)?)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            drop(tx);
            if rows::is_unique_violation(&e) {
                return Err(StoreError::DuplicateConfirmation(
                    booking.confirmation_number.clone(),
                ));
            }
            return Err(StoreError::Database(format!("Failed to insert booking: {e}")));
        }

        tx.commit()
            .await
            .map_err(database("Failed to commit booking"))?;
        Ok(())
    }

    async fn get_booking(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        sqlx::query("SELECT data, status, updated_at FROM bookings WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(database("Failed to load booking"))?
            .map(|row| rows::booking(&row))
            .transpose()
    }

    async fn find_by_confirmation(
        &self,
        number: &ConfirmationNumber,
    ) -> Result<Option<Booking>, StoreError> {
        sqlx::query(
            "SELECT data, status, updated_at FROM bookings WHERE confirmation_number = $1",
        )
        .bind(number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database("Failed to load booking"))?
        .map(|row| rows::booking(&row))
        .transpose()
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let records = sqlx::query(
            r"
            SELECT data, status, updated_at FROM bookings
            WHERE ($1::UUID IS NULL OR user_id = $1)
              AND ($2::UUID IS NULL OR room_id = $2)
              AND ($3::TEXT IS NULL OR status = $3)
            ORDER BY created_at DESC, id
            ",
        )
        .bind(filter.user_id.map(|id| *id.as_uuid()))
        .bind(filter.room_id.map(|id| *id.as_uuid()))
        .bind(filter.status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(database("Failed to list bookings"))?;

        records.iter().map(rows::booking).collect()
    }

    async fn apply_transition(
        &self,
        transition: &Transition,
        at: DateTime<Utc>,
    ) -> Result<Booking, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(database("Failed to start transaction"))?;

        let updated = sqlx::query(
            r"
            UPDATE bookings SET status = $1, updated_at = $2
            WHERE id = $3 AND status = $4
            RETURNING data, status, updated_at
            ",
        )
        .bind(transition.to.as_str())
        .bind(at)
        .bind(*transition.booking_id.as_uuid())
        .bind(transition.from.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(database("Failed to update booking status"))?;

        let Some(row) = updated else {
            let current = sqlx::query("SELECT status FROM bookings WHERE id = $1")
                .bind(*transition.booking_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(database("Failed to load booking"))?;
            drop(tx);

            return match current {
                None => Err(StoreError::NotFound {
                    entity: "Booking",
                    id: transition.booking_id.to_string(),
                }),
                Some(row) => {
                    metrics::counter!("booking_store.status_conflicts_total").increment(1);
                    Err(StoreError::StatusConflict {
                        booking_id: transition.booking_id,
                        actual: rows::status(&row)?,
                        requested: transition.to,
                    })
                }
            };
        };
        let booking = rows::booking(&row)?;

        if transition.inventory == InventoryEffect::Release {
            // Zero rows when the room went away with its hotel.
            sqlx::query("UPDATE rooms SET available = available + 1 WHERE id = $1")
                .bind(*transition.room_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(database("Failed to release inventory"))?;
        }

        tx.commit()
            .await
            .map_err(database("Failed to commit status change"))?;
        Ok(booking)
    }
}
