//! Value objects shared by every part of the booking domain.
//!
//! Identifiers, money, percentages, currency codes, localized text and stay dates.
//! Money is stored in minor units (cents) so pricing never touches floating point.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing `Uuid`
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner `Uuid`
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a hotel
    HotelId
);
uuid_id!(
    /// Unique identifier for a room type within a hotel
    RoomId
);
uuid_id!(
    /// Unique identifier for a discount offer
    OfferId
);
uuid_id!(
    /// Internal primary key of a booking (never shown to guests)
    BookingId
);
uuid_id!(
    /// Identifier of the user account that owns a booking or performs an action
    UserId
);

/// Identifier of an add-on inside a room's add-on list.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddOnId(String);

impl AddOnId {
    /// Creates an `AddOnId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddOnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money
// ============================================================================

/// An amount in minor units (cents).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole major units, `None` on overflow
    #[must_use]
    pub const fn checked_from_major(units: u64) -> Option<Self> {
        match units.checked_mul(100) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Subtracts two amounts (returns None if the result would be negative)
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        if self.0 >= other.0 {
            Some(Self(self.0 - other.0))
        } else {
            None
        }
    }

    /// Multiplies by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Returns `percentage` of this amount, rounded half-up to whole cents.
    ///
    /// The result is not capped; callers decide what a share above 100% means.
    #[must_use]
    pub fn percentage(self, percentage: Percentage) -> Option<Self> {
        let numerator = u128::from(self.0) * u128::from(percentage.basis_points());
        let rounded = (numerator + u128::from(Percentage::SCALE / 2)) / u128::from(Percentage::SCALE);
        u64::try_from(rounded).ok().map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// A percentage expressed in basis points (1 bp = 0.01%).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u32);

impl Percentage {
    /// Basis points in 100%
    pub const SCALE: u32 = 10_000;

    /// Creates a percentage from basis points
    #[must_use]
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    /// Creates a percentage from a whole number of percent, `None` on overflow
    #[must_use]
    pub const fn from_percent(percent: u32) -> Option<Self> {
        match percent.checked_mul(100) {
            Some(bp) => Some(Self(bp)),
            None => None,
        }
    }

    /// Returns the value in basis points
    #[must_use]
    pub const fn basis_points(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// ISO-4217 currency code (three uppercase ASCII letters).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a currency code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCatalogData`] unless the code is three uppercase ASCII letters.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code.to_string()))
        } else {
            Err(ValidationError::InvalidCatalogData(format!(
                "invalid currency code '{code}'"
            )))
        }
    }

    /// Returns the code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount tagged with its currency.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units
    pub amount: Money,
    /// Currency of the amount
    pub currency: CurrencyCode,
}

impl Price {
    /// Creates a `Price`
    #[must_use]
    pub const fn new(amount: Money, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

// ============================================================================
// Localization
// ============================================================================

/// Supported content languages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    En,
    /// Arabic
    Ar,
}

impl Locale {
    /// ISO-639-1 language code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// The other supported language
    #[must_use]
    pub const fn other(&self) -> Self {
        match self {
            Self::En => Self::Ar,
            Self::Ar => Self::En,
        }
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            other => Err(ValidationError::InvalidCatalogData(format!(
                "unsupported language code '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A piece of text carried in both English and Arabic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    /// English text
    #[serde(default)]
    pub en: String,
    /// Arabic text
    #[serde(default)]
    pub ar: String,
}

impl LocalizedText {
    /// Creates a `LocalizedText`
    #[must_use]
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Text in exactly the requested language (may be empty)
    #[must_use]
    pub fn exact(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
        }
    }

    /// Text in the requested language, falling back to the other one when blank
    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        let text = self.exact(locale);
        if text.trim().is_empty() {
            self.exact(locale.other())
        } else {
            text
        }
    }

    /// Whether non-blank text exists for `locale`
    #[must_use]
    pub fn has(&self, locale: Locale) -> bool {
        !self.exact(locale).trim().is_empty()
    }

    /// Returns the first language with blank text, if any
    #[must_use]
    pub fn missing_locale(&self) -> Option<Locale> {
        [Locale::En, Locale::Ar]
            .into_iter()
            .find(|locale| !self.has(*locale))
    }
}

// ============================================================================
// Stay dates
// ============================================================================

/// Check-in / check-out pair with `check_in < check_out` guaranteed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    /// Creates a stay.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDateRange`] if `check_out` is not after `check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ValidationError> {
        if check_in >= check_out {
            return Err(ValidationError::InvalidDateRange(format!(
                "check-out {check_out} must be after check-in {check_in}"
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Arrival date
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Departure date
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights (always at least 1)
    #[must_use]
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    /// Whether the whole stay lies within `[from, to]`
    #[must_use]
    pub fn within(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.check_in >= from && self.check_out <= to
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(28_000).to_string(), "280.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn test_money_percentage_rounds_half_up() {
        // 12.5% of 0.99 = 0.12375 -> 0.12
        let pct = Percentage::from_basis_points(1250);
        assert_eq!(Money::from_cents(99).percentage(pct), Some(Money::from_cents(12)));
        // 50% of 0.01 = 0.005 -> 0.01
        let half = Percentage::from_percent(50).unwrap();
        assert_eq!(Money::from_cents(1).percentage(half), Some(Money::from_cents(1)));
    }

    #[test]
    fn test_money_checked_sub_never_negative() {
        assert_eq!(Money::from_cents(5).checked_sub(Money::from_cents(6)), None);
    }

    #[test]
    fn test_currency_code_validation() {
        assert!(CurrencyCode::parse("SAR").is_ok());
        assert!(CurrencyCode::parse("sar").is_err());
        assert!(CurrencyCode::parse("SARS").is_err());
    }

    #[test]
    fn test_localized_text_falls_back() {
        let text = LocalizedText::new("Sea View", "");
        assert_eq!(text.get(Locale::Ar), "Sea View");
        assert_eq!(text.exact(Locale::Ar), "");
        assert_eq!(text.missing_locale(), Some(Locale::Ar));
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("AR".parse::<Locale>().unwrap(), Locale::Ar);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_stay_dates() {
        let stay = StayDates::new(date("2025-03-01"), date("2025-03-04")).unwrap();
        assert_eq!(stay.nights(), 3);
        assert!(StayDates::new(date("2025-03-04"), date("2025-03-04")).is_err());
        assert!(stay.within(date("2025-03-01"), date("2025-03-31")));
        assert!(!stay.within(date("2025-03-02"), date("2025-03-31")));
    }
}
