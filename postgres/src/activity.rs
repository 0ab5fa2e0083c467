//! Activity log table.

use crate::PostgresStore;
use async_trait::async_trait;
use hotel_booking_core::activity::{ActivityEvent, ActivityLogError, ActivityLogger};

#[async_trait]
impl ActivityLogger for PostgresStore {
    async fn log(&self, event: &ActivityEvent) -> Result<(), ActivityLogError> {
        sqlx::query(
            r"
            INSERT INTO activity_logs (user_id, action, booking_id, details, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(event.user_id.map(|id| *id.as_uuid()))
        .bind(event.action.as_str())
        .bind(*event.booking_id.as_uuid())
        .bind(&event.details)
        .bind(event.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ActivityLogError(format!("Failed to write activity log: {e}")))?;
        Ok(())
    }
}
