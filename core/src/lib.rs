//! # Hotel Booking Core
//!
//! Domain types and pure business rules for the hotel booking system.
//!
//! This crate contains no I/O. It defines the catalog entities, the offer resolver, the pricing
//! engine and the booking state machine, plus the traits through which the imperative shell
//! (`hotel-booking-runtime`) reaches storage, time and the audit trail.
//!
//! ## Components
//!
//! - **Catalog** ([`catalog`]): hotels and rooms with bilingual content and typed facilities,
//!   policies, add-ons and booking conditions
//! - **Offers** ([`offer`]): scoped, time-bounded discounts and best-offer resolution
//! - **Pricing** ([`pricing`]): subtotal, add-ons, discount and total in integer cents
//! - **Bookings** ([`booking`]): booking requests, the booking entity and status transitions
//! - **Environment** ([`environment`], [`store`], [`activity`], [`confirmation`]): injected
//!   dependencies
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Money in minor units, never floating point
//! - Locale is always an explicit parameter
//! - Dependency Injection via traits
//!
//! ## Example
//!
//! ```ignore
//! use hotel_booking_core::{offer, pricing};
//!
//! let stay = booking::validate_stay(&room, check_in, check_out, guests, clock.today())?;
//! let best = offer::resolve_best_offer(&offers, &room, &stay, guests, clock.now())?;
//! let add_ons = room.select_add_ons(&add_on_ids)?;
//! let quote = pricing::compute_total(&room, stay.nights(), &add_ons, best)?;
//! ```

pub mod activity;
pub mod booking;
pub mod catalog;
pub mod confirmation;
pub mod error;
pub mod offer;
pub mod pricing;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use error::{BookingError, BookingResult, ValidationError};
pub use types::{
    AddOnId, BookingId, CurrencyCode, HotelId, Locale, LocalizedText, Money, OfferId, Percentage,
    Price, RoomId, StayDates, UserId,
};

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected into the services.
pub mod environment {
    use chrono::{DateTime, NaiveDate, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// Current UTC calendar date
        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    /// Production clock reading the system time
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
