//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by domain.

pub mod bookings;
pub mod health;
pub mod hotels;
pub mod offers;
pub mod quotes;
pub mod rooms;

// Re-export common handler utilities
pub use health::health_check;
