//! Activity events emitted for the admin audit trail.

use crate::booking::{Booking, BookingStatus};
use crate::types::{BookingId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// A booking was created
    BookingCreated,
    /// A booking changed status
    BookingStatusChanged,
}

impl ActivityAction {
    /// Storage representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BookingCreated => "booking_created",
            Self::BookingStatusChanged => "booking_status_changed",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit-trail entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Acting user; `None` for system actions
    pub user_id: Option<UserId>,
    /// Action
    pub action: ActivityAction,
    /// Affected booking
    pub booking_id: BookingId,
    /// Free-form details
    pub details: serde_json::Value,
    /// When it happened
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEvent {
    /// Event for a newly created booking
    #[must_use]
    pub fn booking_created(booking: &Booking) -> Self {
        Self {
            user_id: Some(booking.user_id),
            action: ActivityAction::BookingCreated,
            booking_id: booking.id,
            details: json!({
                "confirmation_number": booking.confirmation_number,
                "room_id": booking.room_id,
                "status": booking.status,
                "total_price": booking.total_price,
                "currency": booking.currency,
            }),
            occurred_at: booking.created_at,
        }
    }

    /// Event for a status change
    #[must_use]
    pub fn status_changed(
        actor: Option<UserId>,
        booking: &Booking,
        from: BookingStatus,
    ) -> Self {
        Self {
            user_id: actor,
            action: ActivityAction::BookingStatusChanged,
            booking_id: booking.id,
            details: json!({
                "from": from,
                "to": booking.status,
                "confirmation_number": booking.confirmation_number,
            }),
            occurred_at: booking.updated_at,
        }
    }
}

/// Failure to record an activity event. Never fails the operation that emitted it.
#[derive(Error, Debug)]
#[error("Activity log error: {0}")]
pub struct ActivityLogError(pub String);

/// Sink for activity events.
#[async_trait]
pub trait ActivityLogger: Send + Sync {
    /// Records one event
    async fn log(&self, event: &ActivityEvent) -> Result<(), ActivityLogError>;
}
