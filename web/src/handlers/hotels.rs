//! Hotel catalog endpoints.
//!
//! - GET /api/hotels - List hotels (public)
//! - GET /api/hotels/:id - Hotel details (public)
//! - GET /api/hotels/:id/rooms - Rooms of a hotel (public)
//!
//! Public callers only see published hotels; drafts are visible to admins.
//! - PUT /api/hotels/:id - Create or update a hotel (admin)
//! - DELETE /api/hotels/:id - Delete a hotel with its rooms and offers (admin)

use crate::error::AppError;
use crate::extractors::{Actor, AdminActor};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use hotel_booking_core::catalog::{Hotel, HotelFilter, Room};
use hotel_booking_core::{BookingError, HotelId, Locale};
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters of the hotel listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListHotelsQuery {
    /// Only published (`true`) or only drafts (`false`)
    pub published: Option<bool>,
    /// Category, case-insensitive
    pub category: Option<String>,
    /// Only hotels with content in this language (`en` or `ar`)
    pub lang: Option<Locale>,
}

impl ListHotelsQuery {
    /// Converts to a store filter; non-admin callers are pinned to published hotels.
    #[must_use]
    pub fn into_filter(self, sees_drafts: bool) -> HotelFilter {
        HotelFilter {
            published: if sees_drafts { self.published } else { Some(true) },
            category: self.category.filter(|c| !c.trim().is_empty()),
            language: self.lang,
        }
    }
}

fn sees_drafts(actor: Option<&Actor>) -> bool {
    actor.is_some_and(|actor| actor.role.is_admin())
}

/// Loads a hotel, hiding drafts from non-admin callers.
async fn visible_hotel(
    state: &AppState,
    actor: Option<&Actor>,
    id: HotelId,
) -> Result<Hotel, AppError> {
    let hotel = state.catalog.get_hotel(id).await?;
    if !hotel.published && !sees_drafts(actor) {
        return Err(BookingError::not_found("Hotel", id).into());
    }
    Ok(hotel)
}

/// List hotels.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/api/hotels?published=true&category=resort&lang=ar"
/// ```
pub async fn list_hotels(
    actor: Option<Actor>,
    State(state): State<AppState>,
    Query(query): Query<ListHotelsQuery>,
) -> Result<Json<Vec<Hotel>>, AppError> {
    let filter = query.into_filter(sees_drafts(actor.as_ref()));
    let hotels = state.catalog.list_hotels(&filter).await?;
    Ok(Json(hotels))
}

/// Get a hotel by id.
pub async fn get_hotel(
    actor: Option<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Hotel>, AppError> {
    let hotel = visible_hotel(&state, actor.as_ref(), HotelId::from_uuid(id)).await?;
    Ok(Json(hotel))
}

/// List the rooms of a hotel.
pub async fn list_hotel_rooms(
    actor: Option<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Room>>, AppError> {
    let hotel = visible_hotel(&state, actor.as_ref(), HotelId::from_uuid(id)).await?;
    let rooms = state.catalog.list_rooms(Some(hotel.id)).await?;
    Ok(Json(rooms))
}

/// Create or update a hotel. The id in the path wins over the one in the body.
///
/// # Example
///
/// ```bash
/// curl -X PUT http://localhost:8080/api/hotels/550e8400-e29b-41d4-a716-446655440000 \
///   -H "X-User-Id: 770e8400-e29b-41d4-a716-446655440002" \
///   -H "X-User-Role: admin" \
///   -H "Content-Type: application/json" \
///   -d @hotel.json
/// ```
pub async fn save_hotel(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut hotel): Json<Hotel>,
) -> Result<Json<Hotel>, AppError> {
    hotel.id = HotelId::from_uuid(id);
    tracing::debug!(admin = %admin.user_id, hotel_id = %hotel.id, "Saving hotel");
    Ok(Json(state.catalog.save_hotel(hotel).await?))
}

/// Delete a hotel together with its rooms and offers.
pub async fn delete_hotel(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tracing::debug!(admin = %admin.user_id, hotel_id = %id, "Deleting hotel");
    state.catalog.delete_hotel(HotelId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
