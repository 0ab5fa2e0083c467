//! Health check and metrics endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check dependencies (database, etc.).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Prometheus scrape endpoint.
///
/// Returns 503 when no recorder was installed by this process.
///
/// # Endpoint
///
/// ```text
/// GET /metrics
/// ```
#[allow(clippy::unused_async)]
pub async fn metrics(State(state): State<AppState>) -> (StatusCode, String) {
    state.metrics.render().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "metrics recorder not installed".to_string(),
            )
        },
        |body| (StatusCode::OK, body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
