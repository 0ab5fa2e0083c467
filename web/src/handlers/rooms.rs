//! Room endpoints.
//!
//! - GET /api/rooms/:id - Room details (public)
//! - PUT /api/rooms/:id - Create or update a room (admin); updates keep the stored inventory
//! - POST /api/rooms/:id/inventory - Add or withdraw sellable units (admin)

use crate::error::AppError;
use crate::extractors::AdminActor;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use hotel_booking_core::catalog::Room;
use hotel_booking_core::RoomId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of an inventory adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustInventoryRequest {
    /// Units to add (positive) or withdraw (negative)
    pub delta: i32,
}

/// Inventory after an adjustment.
#[derive(Debug, Serialize, Deserialize)]
pub struct InventoryResponse {
    /// Room
    pub room_id: RoomId,
    /// Units now available
    pub available: u32,
}

/// Get a room by id.
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Room>, AppError> {
    Ok(Json(state.catalog.get_room(RoomId::from_uuid(id)).await?))
}

/// Create or update a room. The id in the path wins over the one in the body.
pub async fn save_room(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut room): Json<Room>,
) -> Result<Json<Room>, AppError> {
    room.id = RoomId::from_uuid(id);
    tracing::debug!(admin = %admin.user_id, room_id = %room.id, "Saving room");
    Ok(Json(state.catalog.save_room(room).await?))
}

/// Add or withdraw sellable units of a room.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/rooms/660e8400-e29b-41d4-a716-446655440001/inventory \
///   -H "X-User-Id: 770e8400-e29b-41d4-a716-446655440002" \
///   -H "X-User-Role: admin" \
///   -H "Content-Type: application/json" \
///   -d '{"delta": 2}'
/// ```
pub async fn adjust_inventory(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdjustInventoryRequest>,
) -> Result<Json<InventoryResponse>, AppError> {
    let room_id = RoomId::from_uuid(id);
    tracing::debug!(admin = %admin.user_id, %room_id, delta = request.delta, "Adjusting inventory");
    let available = state
        .catalog
        .adjust_room_inventory(room_id, request.delta)
        .await?;
    Ok(Json(InventoryResponse { room_id, available }))
}
