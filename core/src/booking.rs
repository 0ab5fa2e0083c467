//! Booking entity, booking requests and the booking state machine.
//!
//! ```text
//! pending ──► confirmed ──► completed
//!    │            │
//!    └──► cancelled ◄┘
//! ```
//!
//! `cancelled` and `completed` are terminal. Every cancellation gives the held unit back to the
//! room, because the unit is taken when the booking is created whatever its initial status.

use crate::catalog::Room;
use crate::confirmation::ConfirmationNumber;
use crate::error::{BookingError, ValidationError};
use crate::types::{AddOnId, BookingId, CurrencyCode, HotelId, Money, OfferId, RoomId, StayDates, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Status
// ============================================================================

/// Lifecycle status of a booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting confirmation
    Pending,
    /// Confirmed by an admin or automatically
    Confirmed,
    /// Cancelled (terminal)
    Cancelled,
    /// Stay finished (terminal)
    Completed,
}

impl BookingStatus {
    /// Database / wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// No transition leaves a terminal status
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether the state machine has an edge from `self` to `to`
    #[must_use]
    pub const fn can_transition_to(&self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled | Self::Completed)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

// ============================================================================
// Transitions
// ============================================================================

/// What a status change does to room inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InventoryEffect {
    /// Give one unit back to the room
    Release,
    /// Inventory untouched
    Unchanged,
}

/// A validated status change, ready to be applied by a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Booking being changed
    pub booking_id: BookingId,
    /// Room whose inventory may change
    pub room_id: RoomId,
    /// Status the store must still see for the change to apply
    pub from: BookingStatus,
    /// New status
    pub to: BookingStatus,
    /// Inventory consequence
    pub inventory: InventoryEffect,
}

/// Checks a status change against the state machine.
///
/// # Errors
///
/// Returns [`BookingError::InvalidTransition`] when there is no such edge (including re-applying
/// the current status), and [`ValidationError::InvalidDateRange`] when completing a booking whose
/// check-out date has not passed yet.
pub fn plan_transition(
    booking: &Booking,
    to: BookingStatus,
    today: NaiveDate,
) -> Result<Transition, BookingError> {
    let from = booking.status;
    if !from.can_transition_to(to) {
        return Err(BookingError::InvalidTransition { from, to });
    }

    if to == BookingStatus::Completed && today <= booking.check_out {
        return Err(ValidationError::InvalidDateRange(format!(
            "booking cannot be completed before its check-out date {} has passed",
            booking.check_out
        ))
        .into());
    }

    let inventory = if to == BookingStatus::Cancelled {
        InventoryEffect::Release
    } else {
        InventoryEffect::Unchanged
    };

    Ok(Transition {
        booking_id: booking.id,
        room_id: booking.room_id,
        from,
        to,
        inventory,
    })
}

// ============================================================================
// Booking
// ============================================================================

/// Guest contact details captured when the booking is made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    /// Full name
    pub full_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
}

impl GuestInfo {
    /// Validates the contact snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGuestInfo`] for blank fields or a malformed email.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::InvalidGuestInfo("full name is required".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::InvalidGuestInfo("phone is required".to_string()));
        }
        let email = self.email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(ValidationError::InvalidGuestInfo(format!(
                "'{email}' is not a valid email address"
            )));
        }
        Ok(())
    }
}

/// A guest's request to book a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Booking owner
    pub user_id: UserId,
    /// Room to book
    pub room_id: RoomId,
    /// Arrival
    pub check_in: NaiveDate,
    /// Departure
    pub check_out: NaiveDate,
    /// Number of guests
    pub guests: u32,
    /// Contact snapshot
    pub guest_info: GuestInfo,
    /// Selected add-ons
    #[serde(default)]
    pub add_on_ids: Vec<AddOnId>,
}

/// Validates stay dates, guest count and stay length against a room.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDateRange`], [`ValidationError::GuestCountExceeded`] or
/// [`ValidationError::StayLengthViolation`].
pub fn validate_stay(
    room: &Room,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: u32,
    today: NaiveDate,
) -> Result<StayDates, ValidationError> {
    let stay = StayDates::new(check_in, check_out)?;
    if check_in < today {
        return Err(ValidationError::InvalidDateRange(format!(
            "check-in {check_in} is in the past"
        )));
    }

    if guests == 0 || guests > room.max_guests {
        return Err(ValidationError::GuestCountExceeded {
            requested: guests,
            max_guests: room.max_guests,
        });
    }

    room.booking_conditions.check_stay(stay.nights())?;
    Ok(stay)
}

/// A persisted reservation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Internal id
    pub id: BookingId,
    /// Guest-facing reference
    pub confirmation_number: ConfirmationNumber,
    /// Booking owner
    pub user_id: UserId,
    /// Hotel of the room
    pub hotel_id: HotelId,
    /// Booked room
    pub room_id: RoomId,
    /// Offer the discount came from
    pub offer_id: Option<OfferId>,
    /// Arrival
    pub check_in: NaiveDate,
    /// Departure
    pub check_out: NaiveDate,
    /// Number of guests
    pub guests: u32,
    /// Contact snapshot
    pub guest_info: GuestInfo,
    /// Selected add-ons
    pub add_on_ids: Vec<AddOnId>,
    /// Room price times nights
    pub subtotal: Money,
    /// Non-included add-ons
    pub add_on_total: Money,
    /// Discount off the subtotal
    pub discount_applied: Money,
    /// Amount due
    pub total_price: Money,
    /// Currency of all amounts
    pub currency: CurrencyCode,
    /// Current status
    pub status: BookingStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Nights booked
    #[must_use]
    pub fn nights(&self) -> u32 {
        u32::try_from((self.check_out - self.check_in).num_days()).unwrap_or(0)
    }

    /// Summary returned to the guest after booking
    #[must_use]
    pub fn receipt(&self) -> BookingReceipt {
        BookingReceipt {
            id: self.id,
            confirmation_number: self.confirmation_number.clone(),
            status: self.status,
            total_price: self.total_price,
            discount_applied: self.discount_applied,
            currency: self.currency.clone(),
        }
    }
}

/// Guest-facing result of a successful booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    /// Internal id
    pub id: BookingId,
    /// Guest-facing reference
    pub confirmation_number: ConfirmationNumber,
    /// Initial status
    pub status: BookingStatus,
    /// Amount due
    pub total_price: Money,
    /// Discount taken off
    pub discount_applied: Money,
    /// Currency
    pub currency: CurrencyCode,
}

/// Filter for booking listings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFilter {
    /// Only bookings of this user
    pub user_id: Option<UserId>,
    /// Only bookings of this room
    pub room_id: Option<RoomId>,
    /// Only bookings with this status
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    /// Whether `booking` passes the filter
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.user_id.is_none_or(|id| booking.user_id == id)
            && self.room_id.is_none_or(|id| booking.room_id == id)
            && self.status.is_none_or(|status| booking.status == status)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::catalog::BookingConditions;
    use crate::types::{LocalizedText, Price};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn room() -> Room {
        let now = Utc::now();
        Room {
            id: RoomId::new(),
            hotel_id: HotelId::new(),
            room_type: LocalizedText::new("Twin", "توأم"),
            price: Price::new(Money::from_cents(10_000), CurrencyCode::parse("SAR").unwrap()),
            available: 1,
            max_guests: 2,
            size_sqm: None,
            bed_type: None,
            amenities: vec![],
            add_ons: vec![],
            booking_conditions: BookingConditions {
                minimum_stay: Some(2),
                ..BookingConditions::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    fn booking(status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::new(),
            confirmation_number: ConfirmationNumber::parse("ABCDEFGH23").unwrap(),
            user_id: UserId::new(),
            hotel_id: HotelId::new(),
            room_id: RoomId::new(),
            offer_id: None,
            check_in: date("2030-01-10"),
            check_out: date("2030-01-12"),
            guests: 2,
            guest_info: GuestInfo {
                full_name: "Layla Haddad".to_string(),
                email: "layla@example.com".to_string(),
                phone: "+966500000000".to_string(),
            },
            add_on_ids: vec![],
            subtotal: Money::from_cents(20_000),
            add_on_total: Money::ZERO,
            discount_applied: Money::ZERO,
            total_price: Money::from_cents(20_000),
            currency: CurrencyCode::parse("SAR").unwrap(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_state_machine_edges() {
        use BookingStatus::{Cancelled, Completed, Confirmed, Pending};

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
        for terminal in [Cancelled, Completed] {
            assert!(terminal.is_terminal());
            for to in [Pending, Confirmed, Cancelled, Completed] {
                assert!(!terminal.can_transition_to(to));
            }
        }
    }

    #[test]
    fn test_cancel_releases_inventory() {
        let today = date("2030-01-01");
        for status in [BookingStatus::Pending, BookingStatus::Confirmed] {
            let transition = plan_transition(&booking(status), BookingStatus::Cancelled, today).unwrap();
            assert_eq!(transition.inventory, InventoryEffect::Release);
            assert_eq!(transition.from, status);
        }
    }

    #[test]
    fn test_double_cancel_is_invalid() {
        let err = plan_transition(
            &booking(BookingStatus::Cancelled),
            BookingStatus::Cancelled,
            date("2030-01-01"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BookingError::InvalidTransition {
                from: BookingStatus::Cancelled,
                to: BookingStatus::Cancelled
            }
        ));
    }

    #[test]
    fn test_complete_only_after_checkout() {
        let booking = booking(BookingStatus::Confirmed);

        let early = plan_transition(&booking, BookingStatus::Completed, date("2030-01-12"));
        assert!(matches!(
            early,
            Err(BookingError::Validation(ValidationError::InvalidDateRange(_)))
        ));

        let done = plan_transition(&booking, BookingStatus::Completed, date("2030-01-13")).unwrap();
        assert_eq!(done.inventory, InventoryEffect::Unchanged);
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("refunded".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_minimum_stay_violation() {
        let room = room();
        let err = validate_stay(
            &room,
            date("2030-02-01"),
            date("2030-02-02"),
            1,
            date("2030-01-01"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::StayLengthViolation {
                nights: 1,
                minimum: Some(2),
                ..
            }
        ));
    }

    #[test]
    fn test_validate_stay_rules() {
        let room = room();
        let today = date("2030-01-15");

        assert!(matches!(
            validate_stay(&room, date("2030-01-14"), date("2030-01-17"), 1, today),
            Err(ValidationError::InvalidDateRange(_))
        ));
        assert!(matches!(
            validate_stay(&room, date("2030-01-20"), date("2030-01-18"), 1, today),
            Err(ValidationError::InvalidDateRange(_))
        ));
        assert!(matches!(
            validate_stay(&room, date("2030-01-20"), date("2030-01-23"), 3, today),
            Err(ValidationError::GuestCountExceeded {
                requested: 3,
                max_guests: 2
            })
        ));

        let stay = validate_stay(&room, date("2030-01-15"), date("2030-01-18"), 2, today).unwrap();
        assert_eq!(stay.nights(), 3);
    }

    #[test]
    fn test_guest_info_validation() {
        let mut info = booking(BookingStatus::Pending).guest_info;
        assert!(info.validate().is_ok());

        info.email = "not-an-email".to_string();
        assert!(info.validate().is_err());

        info.email = "layla@example.com".to_string();
        info.full_name = "  ".to_string();
        assert!(info.validate().is_err());
    }

    #[test]
    fn test_booking_filter() {
        let booking = booking(BookingStatus::Pending);
        let by_user = BookingFilter {
            user_id: Some(booking.user_id),
            ..BookingFilter::default()
        };
        assert!(by_user.matches(&booking));

        let confirmed_only = BookingFilter {
            status: Some(BookingStatus::Confirmed),
            ..BookingFilter::default()
        };
        assert!(!confirmed_only.matches(&booking));
    }
}
