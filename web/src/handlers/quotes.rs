//! Price quotes.
//!
//! - POST /api/quotes - Price a stay without booking it (public)

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use hotel_booking_core::pricing::Quote;
use hotel_booking_runtime::QuoteRequest;

/// Price a stay.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/quotes \
///   -H "Content-Type: application/json" \
///   -d '{
///     "room_id": "550e8400-e29b-41d4-a716-446655440000",
///     "check_in": "2025-03-01",
///     "check_out": "2025-03-04",
///     "guests": 2,
///     "add_on_ids": ["breakfast"]
///   }'
/// ```
pub async fn compute_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<Quote>, AppError> {
    Ok(Json(state.bookings.compute_quote(&request).await?))
}
