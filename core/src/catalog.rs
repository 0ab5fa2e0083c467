//! Hotel and room catalog entities.
//!
//! Catalog data is plain data plus boundary validation. Facilities, policies, add-ons and
//! booking conditions are typed, so unknown kinds are rejected at deserialization instead of
//! travelling through the system as loose JSON.

use crate::error::ValidationError;
use crate::types::{AddOnId, HotelId, Locale, LocalizedText, Price, RoomId};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// Shared value objects
// ============================================================================

/// Wall-clock time of day serialized as `HH:MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Parses a `HH:MM` string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCatalogData`] for anything that is not a valid 24h time.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        NaiveTime::parse_from_str(value, "%H:%M")
            .map(Self)
            .map_err(|_| {
                ValidationError::InvalidCatalogData(format!("invalid time '{value}', expected HH:MM"))
            })
    }

    /// Inner time
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.0
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

// ============================================================================
// Hotel
// ============================================================================

/// Public availability banner of a hotel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// Rooms available
    #[default]
    Available,
    /// Few rooms left
    Limited,
    /// No rooms left
    FullyBooked,
    /// Not taking bookings
    Closed,
}

/// Kind of a gallery item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Still image
    Image,
    /// Video clip
    Video,
}

/// One entry of a hotel gallery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Item id
    pub id: String,
    /// Image or video
    pub kind: MediaKind,
    /// Public URL
    pub url: String,
    /// Display position (ascending)
    pub order: u32,
}

/// Facility kinds a hotel can advertise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum FacilityType {
    Wifi,
    Parking,
    Pool,
    Gym,
    Spa,
    Restaurant,
    Bar,
    RoomService,
    AirportShuttle,
    BusinessCenter,
    Laundry,
    Concierge,
    KidsClub,
    Beach,
    AirConditioning,
    Accessibility,
}

/// A facility and whether it is currently offered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    /// Item id
    pub id: String,
    /// Facility kind
    pub kind: FacilityType,
    /// Currently offered
    pub available: bool,
    /// Free-text description
    #[serde(default)]
    pub description: LocalizedText,
}

/// Policy kinds shown on a hotel page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum PolicyType {
    CheckIn,
    CheckOut,
    Cancellation,
    Children,
    Pets,
    Smoking,
    Payment,
    Damage,
}

/// A titled hotel policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Item id
    pub id: String,
    /// Policy kind
    pub kind: PolicyType,
    /// Title
    pub title: LocalizedText,
    /// Body
    pub description: LocalizedText,
}

/// Search-engine metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoFields {
    /// Page title
    #[serde(default)]
    pub title: LocalizedText,
    /// Meta description
    #[serde(default)]
    pub description: LocalizedText,
    /// Keywords
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A hotel as managed by the admin dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    /// Hotel id
    pub id: HotelId,
    /// Display name
    pub name: LocalizedText,
    /// Short location line (e.g. "Corniche, Jeddah")
    pub location: LocalizedText,
    /// Long description
    pub description: LocalizedText,
    /// Street address
    #[serde(default)]
    pub address: LocalizedText,
    /// City
    #[serde(default)]
    pub city: LocalizedText,
    /// Country
    #[serde(default)]
    pub country: LocalizedText,
    /// Free-form category used for filtering (e.g. "resort")
    #[serde(default)]
    pub category: Option<String>,
    /// Official star rating, 1..=5
    pub star_rating: u8,
    /// Average guest rating, 0.0..=5.0
    #[serde(default)]
    pub rating: f32,
    /// Number of guest reviews
    #[serde(default)]
    pub review_count: u32,
    /// Gallery, ordered by `MediaItem::order`
    #[serde(default)]
    pub media: Vec<MediaItem>,
    /// Facilities
    #[serde(default)]
    pub facilities: Vec<Facility>,
    /// Policies
    #[serde(default)]
    pub policies: Vec<Policy>,
    /// Standard check-in time
    pub check_in_time: TimeOfDay,
    /// Standard check-out time
    pub check_out_time: TimeOfDay,
    /// Availability banner
    #[serde(default)]
    pub availability: AvailabilityStatus,
    /// Visible to the public
    #[serde(default)]
    pub published: bool,
    /// Highlighted on the landing page
    #[serde(default)]
    pub featured: bool,
    /// When the hotel was last published
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// SEO metadata
    #[serde(default)]
    pub seo: SeoFields,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Hotel {
    /// Validates ratings, and bilingual content when the hotel is published.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCatalogData`] for out-of-range ratings or duplicate
    /// item ids, and [`ValidationError::IncompleteTranslation`] when a published hotel lacks
    /// English or Arabic name, location or description.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.star_rating) {
            return Err(ValidationError::InvalidCatalogData(format!(
                "star rating must be between 1 and 5, got {}",
                self.star_rating
            )));
        }

        if !(0.0..=5.0).contains(&self.rating) {
            return Err(ValidationError::InvalidCatalogData(format!(
                "guest rating must be between 0.0 and 5.0, got {}",
                self.rating
            )));
        }

        ensure_unique_ids("media", self.media.iter().map(|m| m.id.as_str()))?;
        ensure_unique_ids("facility", self.facilities.iter().map(|f| f.id.as_str()))?;
        ensure_unique_ids("policy", self.policies.iter().map(|p| p.id.as_str()))?;

        if self.published {
            self.ensure_publishable()?;
        }

        Ok(())
    }

    /// Checks that required content exists in both languages.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteTranslation`] naming the first blank field.
    pub fn ensure_publishable(&self) -> Result<(), ValidationError> {
        for (field, text) in [
            ("name", &self.name),
            ("location", &self.location),
            ("description", &self.description),
        ] {
            if let Some(locale) = text.missing_locale() {
                return Err(ValidationError::IncompleteTranslation { field, locale });
            }
        }
        Ok(())
    }

    /// Publishes or unpublishes, stamping `published_at` on the false→true edge.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IncompleteTranslation`] when publishing incomplete content.
    pub fn set_published(&mut self, published: bool, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if published && !self.published {
            self.ensure_publishable()?;
            self.published_at = Some(now);
        } else if !published {
            self.published_at = None;
        }
        self.published = published;
        self.updated_at = now;
        Ok(())
    }

    /// Gallery sorted by display order
    #[must_use]
    pub fn ordered_media(&self) -> Vec<&MediaItem> {
        let mut media: Vec<&MediaItem> = self.media.iter().collect();
        media.sort_by_key(|item| item.order);
        media
    }
}

/// Filter for hotel listings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelFilter {
    /// Only published (`Some(true)`) or only drafts (`Some(false)`)
    pub published: Option<bool>,
    /// Category, compared case-insensitively
    pub category: Option<String>,
    /// Only hotels whose name exists in this language
    pub language: Option<Locale>,
}

impl HotelFilter {
    /// Whether `hotel` passes the filter
    #[must_use]
    pub fn matches(&self, hotel: &Hotel) -> bool {
        if let Some(published) = self.published {
            if hotel.published != published {
                return false;
            }
        }

        if let Some(category) = &self.category {
            let matches_category = hotel
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category));
            if !matches_category {
                return false;
            }
        }

        self.language.is_none_or(|locale| hotel.name.has(locale))
    }
}

// ============================================================================
// Room
// ============================================================================

/// Add-on kinds a room can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum AddOnType {
    Breakfast,
    Dinner,
    LateCheckout,
    EarlyCheckIn,
    AirportTransfer,
    Parking,
    ExtraBed,
    Spa,
    Wifi,
}

/// An optional extra attached to a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    /// Add-on id, unique within the room
    pub id: AddOnId,
    /// Kind
    pub kind: AddOnType,
    /// Already part of the nightly rate
    pub included: bool,
    /// Price per stay; required unless `included`
    #[serde(default)]
    pub price: Option<Price>,
}

/// Cancellation terms of a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Free cancellation until 24h before arrival
    #[default]
    Flexible,
    /// Free cancellation until 5 days before arrival
    Moderate,
    /// Partial refund only
    Strict,
    /// No refund
    NonRefundable,
}

/// Booking rules attached to a room.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConditions {
    /// Cancellation terms
    #[serde(default)]
    pub cancellation_policy: CancellationPolicy,
    /// Minimum nights
    #[serde(default)]
    pub minimum_stay: Option<u32>,
    /// Maximum nights
    #[serde(default)]
    pub maximum_stay: Option<u32>,
    /// Room-specific check-in time
    #[serde(default)]
    pub check_in_time: Option<TimeOfDay>,
    /// Room-specific check-out time
    #[serde(default)]
    pub check_out_time: Option<TimeOfDay>,
    /// Minimum age of the lead guest
    #[serde(default)]
    pub age_restriction: Option<u8>,
    /// Smoking permitted
    #[serde(default)]
    pub smoking_allowed: bool,
    /// Pets permitted
    #[serde(default)]
    pub pets_allowed: bool,
}

impl BookingConditions {
    /// Validates stay limits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCatalogData`] for zero limits or `minimum > maximum`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.minimum_stay == Some(0) || self.maximum_stay == Some(0) {
            return Err(ValidationError::InvalidCatalogData(
                "stay limits must be at least one night".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (self.minimum_stay, self.maximum_stay) {
            if min > max {
                return Err(ValidationError::InvalidCatalogData(format!(
                    "minimum stay {min} exceeds maximum stay {max}"
                )));
            }
        }
        Ok(())
    }

    /// Checks a stay length against the limits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StayLengthViolation`] when `nights` is outside the limits.
    pub fn check_stay(&self, nights: u32) -> Result<(), ValidationError> {
        let too_short = self.minimum_stay.is_some_and(|min| nights < min);
        let too_long = self.maximum_stay.is_some_and(|max| nights > max);
        if too_short || too_long {
            return Err(ValidationError::StayLengthViolation {
                nights,
                minimum: self.minimum_stay,
                maximum: self.maximum_stay,
            });
        }
        Ok(())
    }
}

/// A sellable room type of a hotel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room id
    pub id: RoomId,
    /// Owning hotel
    pub hotel_id: HotelId,
    /// Room type name (e.g. "Deluxe Sea View")
    pub room_type: LocalizedText,
    /// Nightly rate
    pub price: Price,
    /// Units still sellable
    pub available: u32,
    /// Maximum guests per booking
    pub max_guests: u32,
    /// Size in square metres
    #[serde(default)]
    pub size_sqm: Option<u32>,
    /// Bed configuration (e.g. "king")
    #[serde(default)]
    pub bed_type: Option<String>,
    /// Amenity labels
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Add-ons
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    /// Booking rules
    #[serde(default)]
    pub booking_conditions: BookingConditions,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Validates price, capacity, booking conditions and add-ons.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCatalogData`] describing the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.price.amount.is_zero() {
            return Err(ValidationError::InvalidCatalogData(
                "room price must be greater than zero".to_string(),
            ));
        }

        if self.max_guests == 0 {
            return Err(ValidationError::InvalidCatalogData(
                "room must accept at least one guest".to_string(),
            ));
        }

        self.booking_conditions.validate()?;

        ensure_unique_ids("add-on", self.add_ons.iter().map(|a| a.id.as_str()))?;

        for add_on in &self.add_ons {
            match &add_on.price {
                Some(price) if price.currency != self.price.currency => {
                    return Err(ValidationError::InvalidCatalogData(format!(
                        "add-on '{}' is priced in {} but the room is priced in {}",
                        add_on.id, price.currency, self.price.currency
                    )));
                }
                None if !add_on.included => {
                    return Err(ValidationError::InvalidCatalogData(format!(
                        "add-on '{}' is not included and has no price",
                        add_on.id
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Looks up the requested add-ons, de-duplicating repeated ids.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAddOn`] for an id the room does not offer.
    pub fn select_add_ons(&self, ids: &[AddOnId]) -> Result<Vec<&AddOn>, ValidationError> {
        let mut seen = HashSet::new();
        let mut selected = Vec::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(id) {
                continue;
            }
            let add_on = self
                .add_ons
                .iter()
                .find(|a| &a.id == id)
                .ok_or_else(|| ValidationError::UnknownAddOn(id.to_string()))?;
            selected.push(add_on);
        }
        Ok(selected)
    }
}

fn ensure_unique_ids<'a>(
    what: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::InvalidCatalogData(format!(
                "duplicate {what} id '{id}'"
            )));
        }
    }
    Ok(())
}
