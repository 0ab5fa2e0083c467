//! Offer administration.
//!
//! - POST /api/offers - Create an offer for a room or a hotel (admin)

use crate::error::AppError;
use crate::extractors::AdminActor;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use hotel_booking_core::offer::{Discount, Offer, OfferConditions, OfferScope};
use hotel_booking_core::{DateTime, LocalizedText, OfferId, Utc};
use serde::Deserialize;

/// Request to create an offer.
#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    /// Marketing title
    pub title: LocalizedText,
    /// `{"type": "room", "id": ...}` or `{"type": "hotel", "id": ...}`
    pub scope: OfferScope,
    /// `{"type": "percentage", "value": 1000}` (basis points) or
    /// `{"type": "fixed", "value": {"amount": 2000, "currency": "USD"}}`
    pub discount: Discount,
    /// Start of validity
    pub valid_from: DateTime<Utc>,
    /// End of validity
    pub valid_to: DateTime<Utc>,
    /// Whether the offer is live right away
    #[serde(default = "default_active")]
    pub active: bool,
    /// Eligibility rules
    #[serde(default)]
    pub conditions: OfferConditions,
}

const fn default_active() -> bool {
    true
}

impl CreateOfferRequest {
    fn into_offer(self, now: DateTime<Utc>) -> Offer {
        Offer {
            id: OfferId::new(),
            title: self.title,
            scope: self.scope,
            discount: self.discount,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            active: self.active,
            conditions: self.conditions,
            created_at: now,
        }
    }
}

/// Create an offer.
///
/// Percentages above 100 and fixed amounts in a currency other than the room's are rejected
/// with 422.
pub async fn create_offer(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
    Json(body): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<Offer>), AppError> {
    tracing::debug!(admin = %admin.user_id, scope = ?body.scope, "Creating offer");
    let offer = state.catalog.create_offer(body.into_offer(Utc::now())).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}
