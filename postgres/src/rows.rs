//! Row decoding and error mapping shared by the store implementations.

use hotel_booking_core::booking::{Booking, BookingStatus};
use hotel_booking_core::catalog::Room;
use hotel_booking_core::store::StoreError;
use hotel_booking_core::{DateTime, Money, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use sqlx::types::Json;

/// Maps a driver error to [`StoreError::Database`] with some context.
pub(crate) fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| StoreError::Database(format!("{context}: {e}"))
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

pub(crate) fn cents(amount: Money) -> Result<i64, StoreError> {
    i64::try_from(amount.cents())
        .map_err(|_| StoreError::Serialization(format!("amount {amount} out of range")))
}

pub(crate) fn units(available: u32) -> Result<i32, StoreError> {
    i32::try_from(available)
        .map_err(|_| StoreError::Serialization(format!("inventory {available} out of range")))
}

pub(crate) fn from_units(available: i32) -> Result<u32, StoreError> {
    u32::try_from(available)
        .map_err(|_| StoreError::Serialization(format!("negative inventory {available}")))
}

pub(crate) fn json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

pub(crate) fn document<T>(row: &PgRow) -> Result<T, StoreError>
where
    T: serde::de::DeserializeOwned,
{
    row.try_get::<Json<T>, _>("data")
        .map(|Json(value)| value)
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Rooms carry their inventory in a column; the document copy may be stale.
pub(crate) fn room(row: &PgRow) -> Result<Room, StoreError> {
    let mut room: Room = document(row)?;
    let available: i32 = row
        .try_get("available")
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    room.available = from_units(available)?;
    Ok(room)
}

/// Bookings carry their status and last update in columns; the document copy may be stale.
pub(crate) fn booking(row: &PgRow) -> Result<Booking, StoreError> {
    let mut booking: Booking = document(row)?;
    booking.status = status(row)?;
    booking.updated_at = row
        .try_get::<DateTime<Utc>, _>("updated_at")
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(booking)
}

pub(crate) fn status(row: &PgRow) -> Result<BookingStatus, StoreError> {
    let raw: String = row
        .try_get("status")
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    raw.parse().map_err(StoreError::Serialization)
}
