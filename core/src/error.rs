//! Error taxonomy for the booking domain.
//!
//! [`ValidationError`] covers everything a caller can fix by changing the request or the
//! catalog data. [`BookingError`] is the top-level error returned by every public operation.

use crate::booking::BookingStatus;
use crate::types::{Locale, RoomId};
use thiserror::Error;

/// A request or catalog entity violated a domain rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Stay dates are reversed, empty or in the past
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// More guests than the room accepts
    #[error("Guest count {requested} exceeds room capacity of {max_guests}")]
    GuestCountExceeded {
        /// Requested number of guests
        requested: u32,
        /// Room capacity
        max_guests: u32,
    },

    /// Stay length outside the room's minimum/maximum
    #[error("Stay of {nights} night(s) is outside the allowed range (min {minimum:?}, max {maximum:?})")]
    StayLengthViolation {
        /// Requested nights
        nights: u32,
        /// Minimum stay, if set
        minimum: Option<u32>,
        /// Maximum stay, if set
        maximum: Option<u32>,
    },

    /// Hotel, room or add-on data is inconsistent
    #[error("Invalid catalog data: {0}")]
    InvalidCatalogData(String),

    /// Offer definition is invalid
    #[error("Invalid offer: {0}")]
    InvalidOffer(String),

    /// Requested add-on is not offered by the room
    #[error("Add-on '{0}' is not offered by this room")]
    UnknownAddOn(String),

    /// A required translation is blank
    #[error("Field '{field}' has no {locale} text; both languages are required to publish")]
    IncompleteTranslation {
        /// Field name
        field: &'static str,
        /// Missing language
        locale: Locale,
    },

    /// Guest contact snapshot is incomplete
    #[error("Invalid guest information: {0}")]
    InvalidGuestInfo(String),
}

/// Errors returned by catalog, quote and booking operations.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Hotel, room, offer or booking does not exist
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Requested identifier
        id: String,
    },

    /// Request or data failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No sellable unit left for the room
    #[error("Room {room_id} has no units available")]
    RoomUnavailable {
        /// Room that ran out of inventory
        room_id: RoomId,
    },

    /// Status change not allowed by the booking state machine
    #[error("Cannot transition booking from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: BookingStatus,
        /// Requested status
        to: BookingStatus,
    },

    /// Every generated confirmation number collided
    #[error("Could not allocate a unique confirmation number after {attempts} attempts")]
    ConfirmationGenerationFailed {
        /// Attempts made
        attempts: u32,
    },

    /// Storage layer failure
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl BookingError {
    /// Creates a `NotFound` error
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether retrying the whole operation may succeed.
    ///
    /// Only storage failures and exhausted confirmation generation qualify.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::ConfirmationGenerationFailed { .. }
        )
    }

    /// Short machine-readable kind, used for metric labels and API error codes
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(ValidationError::InvalidDateRange(_)) => "invalid_date_range",
            Self::Validation(ValidationError::GuestCountExceeded { .. }) => "guest_count_exceeded",
            Self::Validation(ValidationError::StayLengthViolation { .. }) => "stay_length_violation",
            Self::Validation(ValidationError::InvalidCatalogData(_)) => "invalid_catalog_data",
            Self::Validation(ValidationError::InvalidOffer(_)) => "invalid_offer",
            Self::Validation(ValidationError::UnknownAddOn(_)) => "unknown_add_on",
            Self::Validation(ValidationError::IncompleteTranslation { .. }) => {
                "incomplete_translation"
            }
            Self::Validation(ValidationError::InvalidGuestInfo(_)) => "invalid_guest_info",
            Self::RoomUnavailable { .. } => "room_unavailable",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::ConfirmationGenerationFailed { .. } => "confirmation_generation_failed",
            Self::Persistence(_) => "persistence",
        }
    }
}

/// Result alias for booking operations
pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(BookingError::Persistence("connection reset".into()).is_retryable());
        assert!(BookingError::ConfirmationGenerationFailed { attempts: 5 }.is_retryable());
        assert!(!BookingError::RoomUnavailable {
            room_id: RoomId::new()
        }
        .is_retryable());
        assert!(!BookingError::not_found("Room", "42").is_retryable());
    }

    #[test]
    fn test_not_found_display() {
        let err = BookingError::not_found("Hotel", "abc");
        assert_eq!(err.to_string(), "Hotel with id abc not found");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: BookingError = ValidationError::GuestCountExceeded {
            requested: 5,
            max_guests: 2,
        }
        .into();
        assert_eq!(err.to_string(), "Guest count 5 exceeds room capacity of 2");
        assert_eq!(err.kind(), "guest_count_exceeded");
    }
}
