use async_trait::async_trait;
use hotel_booking_core::activity::{ActivityEvent, ActivityLogError, ActivityLogger};

/// Writes activity events as structured `tracing` records under the `activity` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingActivityLogger;

#[async_trait]
impl ActivityLogger for TracingActivityLogger {
    async fn log(&self, event: &ActivityEvent) -> Result<(), ActivityLogError> {
        tracing::info!(
            target: "activity",
            user_id = ?event.user_id.map(|id| id.to_string()),
            action = %event.action,
            booking_id = %event.booking_id,
            details = %event.details,
            occurred_at = %event.occurred_at,
            "activity"
        );
        Ok(())
    }
}
