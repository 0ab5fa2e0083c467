//! Pricing engine.
//!
//! Pure functions turning a room, a number of nights, selected add-ons and an optional offer into
//! a [`Quote`]. All arithmetic is checked integer arithmetic on cents; overflow is reported as
//! invalid catalog data rather than wrapping.

use crate::catalog::{AddOn, Room};
use crate::error::ValidationError;
use crate::offer::{Discount, Offer};
use crate::types::{CurrencyCode, Money, OfferId, Percentage};
use serde::{Deserialize, Serialize};

/// Price breakdown for one stay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Nights priced
    pub nights: u32,
    /// `nightly rate * nights`
    pub subtotal: Money,
    /// Discount taken off the subtotal, never more than the subtotal
    pub discount_applied: Money,
    /// Sum of non-included add-ons
    pub add_on_total: Money,
    /// `subtotal - discount_applied + add_on_total`
    pub total: Money,
    /// Currency of every amount above
    pub currency: CurrencyCode,
    /// Offer the discount came from
    pub offer_id: Option<OfferId>,
}

fn overflow(what: &str) -> ValidationError {
    ValidationError::InvalidCatalogData(format!("{what} overflows the supported amount range"))
}

/// Room price times nights.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDateRange`] for zero nights and
/// [`ValidationError::InvalidCatalogData`] for a zero price or on overflow.
pub fn subtotal(room: &Room, nights: u32) -> Result<Money, ValidationError> {
    if nights == 0 {
        return Err(ValidationError::InvalidDateRange(
            "a stay must be at least one night".to_string(),
        ));
    }

    // Catalog validation already guarantees this, re-checked because a quote must never be free
    // by accident.
    if room.price.amount.is_zero() {
        return Err(ValidationError::InvalidCatalogData(format!(
            "room {} has no price",
            room.id
        )));
    }

    room.price
        .amount
        .checked_multiply(nights)
        .ok_or_else(|| overflow("subtotal"))
}

/// Sum of the selected add-ons that are not already part of the nightly rate.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCatalogData`] when a paid add-on has no price, is priced in
/// another currency, or the sum overflows.
pub fn add_on_total(room: &Room, add_ons: &[&AddOn]) -> Result<Money, ValidationError> {
    add_ons
        .iter()
        .filter(|add_on| !add_on.included)
        .try_fold(Money::ZERO, |acc, add_on| {
            let price = add_on.price.as_ref().ok_or_else(|| {
                ValidationError::InvalidCatalogData(format!("add-on '{}' has no price", add_on.id))
            })?;
            if price.currency != room.price.currency {
                return Err(ValidationError::InvalidCatalogData(format!(
                    "add-on '{}' is priced in {} but the room is priced in {}",
                    add_on.id, price.currency, room.price.currency
                )));
            }
            acc.checked_add(price.amount)
                .ok_or_else(|| overflow("add-on total"))
        })
}

/// Discount a given offer takes off `subtotal`, capped at `subtotal`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCatalogData`] when a fixed discount is in a different
/// currency than the subtotal.
pub fn discount_for(
    discount: &Discount,
    subtotal: Money,
    currency: &CurrencyCode,
) -> Result<Money, ValidationError> {
    let amount = match discount {
        Discount::Percentage { value } => percentage_of(subtotal, *value)?,
        Discount::Fixed { value } => {
            if &value.currency != currency {
                return Err(ValidationError::InvalidCatalogData(format!(
                    "fixed discount in {} cannot apply to a {currency} price",
                    value.currency
                )));
            }
            value.amount
        }
    };
    Ok(amount.min(subtotal))
}

fn percentage_of(amount: Money, percentage: Percentage) -> Result<Money, ValidationError> {
    amount
        .percentage(percentage)
        .ok_or_else(|| overflow("percentage discount"))
}

/// Computes the full price breakdown for a stay.
///
/// # Errors
///
/// Propagates the errors of [`subtotal`], [`add_on_total`] and [`discount_for`].
pub fn compute_total(
    room: &Room,
    nights: u32,
    add_ons: &[&AddOn],
    offer: Option<&Offer>,
) -> Result<Quote, ValidationError> {
    let subtotal = subtotal(room, nights)?;
    let add_on_total = add_on_total(room, add_ons)?;

    let discount_applied = match offer {
        Some(offer) => discount_for(&offer.discount, subtotal, &room.price.currency)?,
        None => Money::ZERO,
    };

    let total = subtotal
        .checked_sub(discount_applied)
        .and_then(|net| net.checked_add(add_on_total))
        .ok_or_else(|| overflow("total"))?;

    Ok(Quote {
        nights,
        subtotal,
        discount_applied,
        add_on_total,
        total,
        currency: room.price.currency.clone(),
        offer_id: offer.map(|o| o.id),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::catalog::{AddOnType, BookingConditions};
    use crate::offer::{OfferConditions, OfferScope};
    use crate::types::{AddOnId, HotelId, LocalizedText, Price, RoomId};
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn room(price_cents: u64) -> Room {
        let now = Utc::now();
        Room {
            id: RoomId::new(),
            hotel_id: HotelId::new(),
            room_type: LocalizedText::new("Standard", "قياسي"),
            price: Price::new(Money::from_cents(price_cents), usd()),
            available: 1,
            max_guests: 2,
            size_sqm: None,
            bed_type: None,
            amenities: vec![],
            add_ons: vec![],
            booking_conditions: BookingConditions::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn offer(discount: Discount) -> Offer {
        let now = Utc::now();
        Offer {
            id: OfferId::new(),
            title: LocalizedText::new("Offer", "عرض"),
            scope: OfferScope::Room(RoomId::new()),
            discount,
            valid_from: now - Duration::days(1),
            valid_to: now + Duration::days(30),
            active: true,
            conditions: OfferConditions::default(),
            created_at: now,
        }
    }

    fn add_on(id: &str, included: bool, cents: Option<u64>) -> AddOn {
        AddOn {
            id: AddOnId::new(id),
            kind: AddOnType::Breakfast,
            included,
            price: cents.map(|c| Price::new(Money::from_cents(c), usd())),
        }
    }

    #[test]
    fn test_fixed_offer_three_nights() {
        let room = room(10_000);
        let offer = offer(Discount::Fixed {
            value: Price::new(Money::from_cents(2_000), usd()),
        });

        let quote = compute_total(&room, 3, &[], Some(&offer)).unwrap();

        assert_eq!(quote.subtotal.to_string(), "300.00");
        assert_eq!(quote.discount_applied.to_string(), "20.00");
        assert_eq!(quote.add_on_total, Money::ZERO);
        assert_eq!(quote.total.to_string(), "280.00");
        assert_eq!(quote.offer_id, Some(offer.id));
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let room = room(1_000);
        let offer = offer(Discount::Fixed {
            value: Price::new(Money::from_cents(5_000), usd()),
        });
        let extras = add_on("dinner", false, Some(700));

        let quote = compute_total(&room, 1, &[&extras], Some(&offer)).unwrap();

        assert_eq!(quote.discount_applied, Money::from_cents(1_000));
        // add-ons are never discounted
        assert_eq!(quote.total, Money::from_cents(700));
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        let room = room(3_333);
        let offer = offer(Discount::Percentage {
            value: Percentage::from_basis_points(1_500),
        });

        let quote = compute_total(&room, 1, &[], Some(&offer)).unwrap();

        // 15% of 33.33 = 4.9995
        assert_eq!(quote.discount_applied, Money::from_cents(500));
        assert_eq!(quote.total, Money::from_cents(2_833));
    }

    #[test]
    fn test_included_add_ons_are_free() {
        let room = room(10_000);
        let wifi = add_on("wifi", true, None);
        let breakfast = add_on("breakfast", false, Some(1_500));

        let quote = compute_total(&room, 2, &[&wifi, &breakfast], None).unwrap();

        assert_eq!(quote.add_on_total, Money::from_cents(1_500));
        assert_eq!(quote.total, Money::from_cents(21_500));
    }

    #[test]
    fn test_zero_nights_rejected() {
        let err = compute_total(&room(10_000), 0, &[], None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateRange(_)));
    }

    #[test]
    fn test_zero_price_rejected() {
        let err = compute_total(&room(0), 2, &[], None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCatalogData(_)));
    }

    #[test]
    fn test_fixed_discount_currency_mismatch() {
        let eur = CurrencyCode::parse("EUR").unwrap();
        let discount = Discount::Fixed {
            value: Price::new(Money::from_cents(100), eur),
        };
        assert!(discount_for(&discount, Money::from_cents(1_000), &usd()).is_err());
    }

    proptest! {
        #[test]
        fn prop_discount_never_exceeds_subtotal(
            price in 1u64..1_000_000,
            nights in 1u32..60,
            bp in 1u32..=10_000,
            fixed in 1u64..100_000_000,
            use_fixed in any::<bool>(),
        ) {
            let room = room(price);
            let discount = if use_fixed {
                Discount::Fixed { value: Price::new(Money::from_cents(fixed), usd()) }
            } else {
                Discount::Percentage { value: Percentage::from_basis_points(bp) }
            };
            let offer = offer(discount);

            let quote = compute_total(&room, nights, &[], Some(&offer)).unwrap();

            prop_assert!(quote.discount_applied <= quote.subtotal);
            prop_assert_eq!(
                quote.total.cents(),
                quote.subtotal.cents() - quote.discount_applied.cents() + quote.add_on_total.cents()
            );
        }

        #[test]
        fn prop_quote_is_deterministic(price in 1u64..1_000_000, nights in 1u32..60) {
            let room = room(price);
            let first = compute_total(&room, nights, &[], None).unwrap();
            let second = compute_total(&room, nights, &[], None).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
