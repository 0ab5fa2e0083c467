//! Fixture builders for catalog entities, offers and booking requests.
//!
//! Every builder returns valid data; tests tweak the fields they care about.

#![allow(clippy::unwrap_used)] // Fixtures use hardcoded, known-valid values
#![allow(clippy::missing_panics_doc)]

use chrono::{DateTime, Duration, NaiveDate, Utc};
use hotel_booking_core::booking::{BookingRequest, GuestInfo};
use hotel_booking_core::catalog::{
    AddOn, AddOnType, AvailabilityStatus, BookingConditions, Facility, FacilityType, Hotel,
    MediaItem, MediaKind, Policy, PolicyType, Room, SeoFields, TimeOfDay,
};
use hotel_booking_core::offer::{Discount, Offer, OfferConditions, OfferScope};
use hotel_booking_core::{
    AddOnId, CurrencyCode, HotelId, LocalizedText, Money, OfferId, Percentage, Price, RoomId,
    UserId,
};

/// US dollars
#[must_use]
pub fn usd() -> CurrencyCode {
    CurrencyCode::parse("USD").unwrap()
}

/// Calendar date shorthand
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A complete, bilingual, unpublished hotel
#[must_use]
pub fn hotel(now: DateTime<Utc>) -> Hotel {
    Hotel {
        id: HotelId::new(),
        name: LocalizedText::new("Corniche Grand Hotel", "فندق الكورنيش الكبير"),
        location: LocalizedText::new("Corniche, Jeddah", "الكورنيش، جدة"),
        description: LocalizedText::new(
            "Sea-view rooms on the Jeddah waterfront",
            "غرف مطلة على البحر على واجهة جدة البحرية",
        ),
        address: LocalizedText::new("North Corniche Road", "طريق الكورنيش الشمالي"),
        city: LocalizedText::new("Jeddah", "جدة"),
        country: LocalizedText::new("Saudi Arabia", "المملكة العربية السعودية"),
        category: Some("resort".to_string()),
        star_rating: 5,
        rating: 4.5,
        review_count: 212,
        media: vec![MediaItem {
            id: "m1".to_string(),
            kind: MediaKind::Image,
            url: "https://cdn.example.com/hotels/corniche/lobby.jpg".to_string(),
            order: 1,
        }],
        facilities: vec![Facility {
            id: "f1".to_string(),
            kind: FacilityType::Pool,
            available: true,
            description: LocalizedText::new("Infinity pool", "مسبح لا متناهي"),
        }],
        policies: vec![Policy {
            id: "p1".to_string(),
            kind: PolicyType::Pets,
            title: LocalizedText::new("Pets", "الحيوانات الأليفة"),
            description: LocalizedText::new("No pets allowed", "لا يسمح بالحيوانات الأليفة"),
        }],
        check_in_time: TimeOfDay::parse("15:00").unwrap(),
        check_out_time: TimeOfDay::parse("12:00").unwrap(),
        availability: AvailabilityStatus::Available,
        published: false,
        featured: false,
        published_at: None,
        seo: SeoFields::default(),
        created_at: now,
        updated_at: now,
    }
}

/// A room of `hotel` with the given nightly rate (in cents) and inventory
#[must_use]
pub fn room(hotel: &Hotel, price_cents: u64, available: u32) -> Room {
    Room {
        id: RoomId::new(),
        hotel_id: hotel.id,
        room_type: LocalizedText::new("Deluxe Sea View", "ديلوكس بإطلالة بحرية"),
        price: Price::new(Money::from_cents(price_cents), usd()),
        available,
        max_guests: 2,
        size_sqm: Some(35),
        bed_type: Some("king".to_string()),
        amenities: vec!["minibar".to_string(), "balcony".to_string()],
        add_ons: vec![
            AddOn {
                id: AddOnId::new("breakfast"),
                kind: AddOnType::Breakfast,
                included: false,
                price: Some(Price::new(Money::from_cents(2_500), usd())),
            },
            AddOn {
                id: AddOnId::new("wifi"),
                kind: AddOnType::Wifi,
                included: true,
                price: None,
            },
        ],
        booking_conditions: BookingConditions::default(),
        created_at: hotel.created_at,
        updated_at: hotel.created_at,
    }
}

/// An active offer valid from a day before `now` to a month after
#[must_use]
pub fn offer(scope: OfferScope, discount: Discount, now: DateTime<Utc>) -> Offer {
    Offer {
        id: OfferId::new(),
        title: LocalizedText::new("Summer deal", "عرض الصيف"),
        scope,
        discount,
        valid_from: now - Duration::days(1),
        valid_to: now + Duration::days(30),
        active: true,
        conditions: OfferConditions::default(),
        created_at: now,
    }
}

/// Flat discount in USD
#[must_use]
pub fn fixed(cents: u64) -> Discount {
    Discount::Fixed {
        value: Price::new(Money::from_cents(cents), usd()),
    }
}

/// Whole-number percentage discount
#[must_use]
pub fn percent(percent: u32) -> Discount {
    Discount::Percentage {
        value: Percentage::from_percent(percent).unwrap(),
    }
}

/// Guest contact snapshot
#[must_use]
pub fn guest() -> GuestInfo {
    GuestInfo {
        full_name: "Omar Al-Farsi".to_string(),
        email: "omar@example.com".to_string(),
        phone: "+966 55 123 4567".to_string(),
    }
}

/// Request for two guests arriving a week after `today`, staying `nights` nights
#[must_use]
pub fn booking_request(room: &Room, today: NaiveDate, nights: i64) -> BookingRequest {
    let check_in = today + Duration::days(7);
    BookingRequest {
        user_id: UserId::new(),
        room_id: room.id,
        check_in,
        check_out: check_in + Duration::days(nights),
        guests: 2,
        guest_info: guest(),
        add_on_ids: vec![],
    }
}
