//! Booking endpoints.
//!
//! - POST /api/bookings - Book a room (requires auth)
//! - GET /api/bookings - List own bookings, or any bookings for admins (requires auth)
//! - GET /api/bookings/:id - Booking details (requires auth + ownership or admin)
//! - GET /api/bookings/confirmation/:number - Look up by confirmation number (public)
//! - POST /api/bookings/:id/status - Change status (admin)
//! - POST /api/bookings/complete-due - Complete stays whose check-out has passed (admin)
//!
//! # State Machine
//!
//! ```text
//! pending → confirmed → completed
//!    ↓          ↓
//! cancelled  cancelled
//! ```
//!
//! Cancelling returns the room unit to inventory.

use crate::error::AppError;
use crate::extractors::{Actor, AdminActor};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use hotel_booking_core::booking::{
    Booking, BookingFilter, BookingReceipt, BookingRequest, BookingStatus, GuestInfo,
};
use hotel_booking_core::confirmation::ConfirmationNumber;
use hotel_booking_core::{AddOnId, BookingError, BookingId, NaiveDate, RoomId, UserId};
use hotel_booking_runtime::retry::retry_transient;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to book a room. The owner is the signed-in caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// Room to book
    pub room_id: Uuid,
    /// Arrival
    pub check_in: NaiveDate,
    /// Departure
    pub check_out: NaiveDate,
    /// Number of guests
    pub guests: u32,
    /// Contact details
    pub guest_info: GuestInfo,
    /// Selected add-ons
    #[serde(default)]
    pub add_on_ids: Vec<AddOnId>,
}

impl CreateBookingRequest {
    fn for_user(self, user_id: UserId) -> BookingRequest {
        BookingRequest {
            user_id,
            room_id: RoomId::from_uuid(self.room_id),
            check_in: self.check_in,
            check_out: self.check_out,
            guests: self.guests,
            guest_info: self.guest_info,
            add_on_ids: self.add_on_ids,
        }
    }
}

/// Query parameters of the booking listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListBookingsQuery {
    /// Only this status
    pub status: Option<BookingStatus>,
    /// Only this room
    pub room_id: Option<Uuid>,
    /// Only this user (ignored for non-admins)
    pub user_id: Option<Uuid>,
}

/// Request to change a booking's status.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    /// Target status
    pub status: BookingStatus,
}

/// Response of the completion sweep.
#[derive(Debug, Serialize)]
pub struct CompleteDueResponse {
    /// Number of bookings completed
    pub completed: usize,
    /// Ids of the completed bookings
    pub booking_ids: Vec<BookingId>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Book a room.
///
/// Transient storage failures are retried according to the configured policy.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/bookings \
///   -H "X-User-Id: 770e8400-e29b-41d4-a716-446655440002" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "room_id": "550e8400-e29b-41d4-a716-446655440000",
///     "check_in": "2025-03-01",
///     "check_out": "2025-03-04",
///     "guests": 2,
///     "guest_info": {"full_name": "Omar Al-Farsi", "email": "omar@example.com", "phone": "+966551234567"}
///   }'
/// ```
///
/// Response (201):
/// ```json
/// {
///   "id": "660e8400-e29b-41d4-a716-446655440001",
///   "confirmation_number": "K7QZ3MPX2A",
///   "status": "pending",
///   "total_price": 28000,
///   "discount_applied": 2000,
///   "currency": "USD"
/// }
/// ```
pub async fn create_booking(
    actor: Actor,
    State(state): State<AppState>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingReceipt>), AppError> {
    let request = body.for_user(actor.user_id);
    let booking = retry_transient(&state.retry, || {
        state.bookings.create_booking(request.clone())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(booking.receipt())))
}

/// List bookings. Guests only ever see their own.
pub async fn list_bookings(
    actor: Actor,
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let user_id = if actor.role.is_admin() {
        query.user_id.map(UserId::from_uuid)
    } else {
        Some(actor.user_id)
    };
    let filter = BookingFilter {
        user_id,
        room_id: query.room_id.map(RoomId::from_uuid),
        status: query.status,
    };
    Ok(Json(state.bookings.list_bookings(&filter).await?))
}

/// Get a booking by id.
pub async fn get_booking(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.get_booking(BookingId::from_uuid(id)).await?;
    if !actor.can_access(booking.user_id) {
        return Err(AppError::forbidden("This booking belongs to another user"));
    }
    Ok(Json(booking))
}

/// Look up a booking by its confirmation number (case-insensitive).
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/bookings/confirmation/k7qz3mpx2a
/// ```
pub async fn find_by_confirmation(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<BookingReceipt>, AppError> {
    let number = ConfirmationNumber::parse(&number).map_err(BookingError::from)?;
    let booking = state.bookings.find_by_confirmation(&number).await?;
    Ok(Json(booking.receipt()))
}

/// Change a booking's status.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/bookings/660e8400-e29b-41d4-a716-446655440001/status \
///   -H "X-User-Id: 770e8400-e29b-41d4-a716-446655440002" \
///   -H "X-User-Role: admin" \
///   -H "Content-Type: application/json" \
///   -d '{"status": "confirmed"}'
/// ```
pub async fn change_status(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ChangeStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking_id = BookingId::from_uuid(id);
    let booking = retry_transient(&state.retry, || {
        state
            .bookings
            .transition_booking(Some(admin.user_id), booking_id, body.status)
    })
    .await?;
    Ok(Json(booking))
}

/// Complete every confirmed booking whose check-out date has passed.
pub async fn complete_due(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
) -> Result<Json<CompleteDueResponse>, AppError> {
    tracing::debug!(admin = %admin.user_id, "Completing due bookings");
    let completed = state
        .bookings
        .complete_due_bookings(state.bookings.today())
        .await?;
    Ok(Json(CompleteDueResponse {
        completed: completed.len(),
        booking_ids: completed.iter().map(|b| b.id).collect(),
    }))
}
