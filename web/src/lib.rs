//! Axum HTTP surface for the hotel booking system.
//!
//! Handlers are thin: they extract the caller and the payload, call `CatalogService` or
//! `BookingService`, and map the outcome to a response. All business rules live in
//! `hotel-booking-core` and `hotel-booking-runtime`.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at Axum handler
//! 2. **Extract data** from request (JSON, path, query, `X-User-*` headers)
//! 3. **Call** the catalog or booking service
//! 4. **Map result** to HTTP response (`BookingError` → [`AppError`])
//!
//! # Example
//!
//! ```ignore
//! use hotel_booking_web::{router, AppState};
//!
//! let state = AppState::new(env, BookingConfig::default(), metrics, RetryPolicy::default());
//! let app = router(state, Duration::from_secs(30));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod state;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use handlers::{bookings, health, hotels, offers, quotes, rooms};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

// Re-export key types for convenience
pub use config::{Config, ConfigError, StorageKind};
pub use error::AppError;
pub use extractors::{Actor, AdminActor, Role};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

/// Build the complete Axum router.
///
/// Every request gets an `x-request-id` (generated when absent and echoed back), a tracing span
/// and a timeout of `request_timeout` (408 when exceeded).
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let api_routes = Router::new()
        // Catalog
        .route("/hotels", get(hotels::list_hotels))
        .route(
            "/hotels/:id",
            get(hotels::get_hotel)
                .put(hotels::save_hotel)
                .delete(hotels::delete_hotel),
        )
        .route("/hotels/:id/rooms", get(hotels::list_hotel_rooms))
        .route("/rooms/:id", get(rooms::get_room).put(rooms::save_room))
        .route("/rooms/:id/inventory", post(rooms::adjust_inventory))
        // Pricing
        .route("/quotes", post(quotes::compute_quote))
        // Bookings
        .route(
            "/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/bookings/complete-due", post(bookings::complete_due))
        .route(
            "/bookings/confirmation/:number",
            get(bookings::find_by_confirmation),
        )
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id/status", post(bookings::change_status))
        // Offers
        .route("/offers", post(offers::create_offer));

    Router::new()
        // Health and metrics (no authentication)
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
        .with_state(state)
}

