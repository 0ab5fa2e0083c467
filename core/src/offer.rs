//! Discount offers and the best-offer resolver.

use crate::catalog::Room;
use crate::error::ValidationError;
use crate::pricing;
use crate::types::{HotelId, LocalizedText, Money, OfferId, Percentage, Price, RoomId, StayDates};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// What an offer applies to. Exactly one target, by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum OfferScope {
    /// A single room type
    Room(RoomId),
    /// Every room of a hotel
    Hotel(HotelId),
}

impl OfferScope {
    /// Whether the offer targets `room` directly or through its hotel
    #[must_use]
    pub fn targets(&self, room: &Room) -> bool {
        match self {
            Self::Room(id) => *id == room.id,
            Self::Hotel(id) => *id == room.hotel_id,
        }
    }

    /// Room-scoped offers outrank hotel-scoped ones
    #[must_use]
    pub const fn is_room(&self) -> bool {
        matches!(self, Self::Room(_))
    }
}

/// How much an offer takes off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Discount {
    /// Share of the room subtotal, in basis points
    Percentage {
        /// Basis points, `0 < value <= 10_000`
        value: Percentage,
    },
    /// Flat amount off the room subtotal
    Fixed {
        /// Positive amount in the room's currency
        value: Price,
    },
}

impl Discount {
    /// Validates the discount value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOffer`] for a percentage outside `(0, 100]` or a zero
    /// fixed amount.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Percentage { value } => {
                let bp = value.basis_points();
                if bp == 0 || bp > Percentage::SCALE {
                    return Err(ValidationError::InvalidOffer(format!(
                        "percentage discount must be greater than 0% and at most 100%, got {value}"
                    )));
                }
            }
            Self::Fixed { value } => {
                if value.amount == Money::ZERO {
                    return Err(ValidationError::InvalidOffer(
                        "fixed discount must be greater than zero".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Inclusive date window a stay must fall into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First allowed date
    pub from: NaiveDate,
    /// Last allowed date
    pub to: NaiveDate,
}

/// Optional eligibility rules of an offer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferConditions {
    /// Minimum nights
    #[serde(default)]
    pub min_nights: Option<u32>,
    /// Maximum guests
    #[serde(default)]
    pub max_guests: Option<u32>,
    /// Stay window
    #[serde(default)]
    pub booking_dates: Option<DateWindow>,
}

/// A time-bounded discount scoped to a room or a whole hotel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Offer id
    pub id: OfferId,
    /// Marketing title
    pub title: LocalizedText,
    /// Room or hotel
    pub scope: OfferScope,
    /// Discount definition
    pub discount: Discount,
    /// Start of validity
    pub valid_from: DateTime<Utc>,
    /// End of validity
    pub valid_to: DateTime<Utc>,
    /// Switched on by an admin
    pub active: bool,
    /// Eligibility rules
    #[serde(default)]
    pub conditions: OfferConditions,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Offer {
    /// Validates the offer before it is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOffer`] describing the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.discount.validate()?;

        if self.valid_from >= self.valid_to {
            return Err(ValidationError::InvalidOffer(format!(
                "valid_from {} must be before valid_to {}",
                self.valid_from, self.valid_to
            )));
        }

        if self.conditions.min_nights == Some(0) {
            return Err(ValidationError::InvalidOffer(
                "min_nights must be at least 1".to_string(),
            ));
        }

        if self.conditions.max_guests == Some(0) {
            return Err(ValidationError::InvalidOffer(
                "max_guests must be at least 1".to_string(),
            ));
        }

        if let Some(window) = &self.conditions.booking_dates {
            if window.from >= window.to {
                return Err(ValidationError::InvalidOffer(format!(
                    "booking window {} to {} is empty",
                    window.from, window.to
                )));
            }
        }

        Ok(())
    }

    /// Whether the offer is switched on and inside its validity period
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && self.valid_from <= now && now <= self.valid_to
    }

    /// Whether this offer applies to the given stay.
    #[must_use]
    pub fn qualifies(&self, room: &Room, stay: &StayDates, guests: u32, now: DateTime<Utc>) -> bool {
        if !self.is_live(now) || !self.scope.targets(room) {
            return false;
        }

        if let Discount::Fixed { value } = &self.discount {
            if value.currency != room.price.currency {
                return false;
            }
        }

        let conditions = &self.conditions;
        if conditions.min_nights.is_some_and(|min| stay.nights() < min) {
            return false;
        }
        if conditions.max_guests.is_some_and(|max| guests > max) {
            return false;
        }
        conditions
            .booking_dates
            .is_none_or(|window| stay.within(window.from, window.to))
    }
}

/// Picks the offer giving the largest absolute discount on this stay.
///
/// Room-scoped offers shadow hotel-scoped ones: hotel offers are only considered when no room
/// offer qualifies. Ties go to the later `valid_to`, then to the smaller id.
///
/// # Errors
///
/// Returns the pricing error if the room subtotal cannot be computed.
pub fn resolve_best_offer<'a>(
    offers: &'a [Offer],
    room: &Room,
    stay: &StayDates,
    guests: u32,
    now: DateTime<Utc>,
) -> Result<Option<&'a Offer>, ValidationError> {
    let qualifying: Vec<&Offer> = offers
        .iter()
        .filter(|offer| offer.qualifies(room, stay, guests, now))
        .collect();

    let room_scoped = qualifying.iter().any(|offer| offer.scope.is_room());
    let candidates = qualifying
        .into_iter()
        .filter(|offer| offer.scope.is_room() == room_scoped);

    let subtotal = pricing::subtotal(room, stay.nights())?;

    let mut best: Option<(&Offer, Money)> = None;
    for offer in candidates {
        let amount = pricing::discount_for(&offer.discount, subtotal, &room.price.currency)?;
        best = match best {
            Some((current, current_amount))
                if compare(current, current_amount, offer, amount) != Ordering::Less =>
            {
                Some((current, current_amount))
            }
            _ => Some((offer, amount)),
        };
    }

    Ok(best.map(|(offer, _)| offer))
}

/// Orders two candidates, `Greater` meaning `a` wins.
fn compare(a: &Offer, a_amount: Money, b: &Offer, b_amount: Money) -> Ordering {
    a_amount
        .cmp(&b_amount)
        .then_with(|| a.scope.is_room().cmp(&b.scope.is_room()))
        .then_with(|| a.valid_to.cmp(&b.valid_to))
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::catalog::BookingConditions;
    use crate::types::CurrencyCode;
    use chrono::Duration;

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn room() -> Room {
        let now = Utc::now();
        Room {
            id: RoomId::new(),
            hotel_id: HotelId::new(),
            room_type: LocalizedText::new("Suite", "جناح"),
            price: Price::new(Money::from_cents(10_000), usd()),
            available: 2,
            max_guests: 4,
            size_sqm: None,
            bed_type: None,
            amenities: vec![],
            add_ons: vec![],
            booking_conditions: BookingConditions::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn stay(nights: i64) -> StayDates {
        let check_in = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap();
        StayDates::new(check_in, check_in + Duration::days(nights)).unwrap()
    }

    fn offer(scope: OfferScope, discount: Discount) -> Offer {
        let now = Utc::now();
        Offer {
            id: OfferId::new(),
            title: LocalizedText::new("Deal", "عرض"),
            scope,
            discount,
            valid_from: now - Duration::days(1),
            valid_to: now + Duration::days(30),
            active: true,
            conditions: OfferConditions::default(),
            created_at: now,
        }
    }

    fn fixed(cents: u64) -> Discount {
        Discount::Fixed {
            value: Price::new(Money::from_cents(cents), usd()),
        }
    }

    fn percent(p: u32) -> Discount {
        Discount::Percentage {
            value: Percentage::from_percent(p).unwrap(),
        }
    }

    #[test]
    fn test_percentage_above_hundred_rejected() {
        let room = room();
        let offer = offer(OfferScope::Room(room.id), percent(150));
        assert!(matches!(
            offer.validate(),
            Err(ValidationError::InvalidOffer(_))
        ));
    }

    #[test]
    fn test_reversed_window_rejected() {
        let room = room();
        let mut offer = offer(OfferScope::Room(room.id), percent(10));
        offer.valid_to = offer.valid_from;
        assert!(offer.validate().is_err());
    }

    #[test]
    fn test_largest_absolute_discount_wins() {
        let room = room();
        // 3 nights = 300.00: 10% = 30.00 beats a flat 20.00
        let offers = vec![
            offer(OfferScope::Room(room.id), fixed(2_000)),
            offer(OfferScope::Room(room.id), percent(10)),
        ];

        let best = resolve_best_offer(&offers, &room, &stay(3), 2, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(best.id, offers[1].id);
    }

    #[test]
    fn test_room_offer_shadows_hotel_offer() {
        let room = room();
        let offers = vec![
            offer(OfferScope::Hotel(room.hotel_id), percent(50)),
            offer(OfferScope::Room(room.id), fixed(1_000)),
        ];

        let best = resolve_best_offer(&offers, &room, &stay(2), 1, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(best.id, offers[1].id);
    }

    #[test]
    fn test_hotel_offer_used_when_no_room_offer() {
        let room = room();
        let mut other_room = offer(OfferScope::Room(RoomId::new()), percent(90));
        other_room.title = LocalizedText::new("Other", "آخر");
        let offers = vec![other_room, offer(OfferScope::Hotel(room.hotel_id), percent(5))];

        let best = resolve_best_offer(&offers, &room, &stay(2), 1, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(best.id, offers[1].id);
    }

    #[test]
    fn test_tie_prefers_later_valid_to() {
        let room = room();
        let short = offer(OfferScope::Room(room.id), fixed(1_000));
        let mut long = offer(OfferScope::Room(room.id), fixed(1_000));
        long.valid_to = short.valid_to + Duration::days(10);
        let offers = vec![short, long];

        let best = resolve_best_offer(&offers, &room, &stay(2), 1, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(best.id, offers[1].id);
    }

    #[test]
    fn test_inactive_and_expired_offers_ignored() {
        let room = room();
        let mut inactive = offer(OfferScope::Room(room.id), percent(20));
        inactive.active = false;
        let mut expired = offer(OfferScope::Room(room.id), percent(30));
        expired.valid_to = Utc::now() - Duration::hours(1);
        expired.valid_from = expired.valid_to - Duration::days(5);

        let offers = [inactive, expired];
        let best = resolve_best_offer(&offers, &room, &stay(2), 1, Utc::now()).unwrap();
        assert!(best.is_none());
    }

    #[test]
    fn test_conditions_filter_offers() {
        let room = room();
        let mut long_stay = offer(OfferScope::Room(room.id), percent(20));
        long_stay.conditions.min_nights = Some(5);
        let mut couples = offer(OfferScope::Room(room.id), percent(15));
        couples.conditions.max_guests = Some(2);
        let mut window = offer(OfferScope::Room(room.id), percent(10));
        window.conditions.booking_dates = Some(DateWindow {
            from: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
        });
        let offers = vec![long_stay, couples, window];

        let now = Utc::now();
        assert!(resolve_best_offer(&offers, &room, &stay(3), 3, now).unwrap().is_none());

        let best = resolve_best_offer(&offers, &room, &stay(3), 2, now)
            .unwrap()
            .unwrap();
        assert_eq!(best.id, offers[1].id);

        let best = resolve_best_offer(&offers, &room, &stay(6), 4, now)
            .unwrap()
            .unwrap();
        assert_eq!(best.id, offers[0].id);
    }

    #[test]
    fn test_fixed_offer_in_other_currency_never_qualifies() {
        let room = room();
        let eur = CurrencyCode::parse("EUR").unwrap();
        let offer = offer(
            OfferScope::Room(room.id),
            Discount::Fixed {
                value: Price::new(Money::from_cents(1_000), eur),
            },
        );
        assert!(!offer.qualifies(&room, &stay(2), 1, Utc::now()));
    }

    #[test]
    fn test_scope_serialization() {
        let id = RoomId::new();
        let json = serde_json::to_value(OfferScope::Room(id)).unwrap();
        assert_eq!(json["type"], "room");
        assert_eq!(json["id"], id.to_string());
    }
}
