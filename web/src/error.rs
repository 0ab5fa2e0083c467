//! Error types for web handlers.
//!
//! [`AppError`] bridges [`BookingError`] and HTTP responses. Domain errors the caller can act
//! on keep their message; storage failures become a generic 500 and are logged in full.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hotel_booking_core::BookingError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Implements Axum's `IntoResponse`, so handlers return `Result<_, AppError>` and use `?` on
/// service calls.
///
/// # Examples
///
/// ```ignore
/// async fn get_room(
///     State(state): State<AppState>,
///     Path(id): Path<RoomId>,
/// ) -> Result<Json<Room>, AppError> {
///     Ok(Json(state.catalog.get_room(id).await?))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            message.into(),
            "FORBIDDEN".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// NotFound → 404, Validation → 422, RoomUnavailable/InvalidTransition → 409, the rest → 500.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let code = err.kind().to_ascii_uppercase();
        let status = match &err {
            BookingError::NotFound { .. } => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::RoomUnavailable { .. } | BookingError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            BookingError::ConfirmationGenerationFailed { .. } | BookingError::Persistence(_) => {
                return Self::internal("An internal error occurred, please try again")
                    .with_source(anyhow::Error::new(err));
            }
        };
        Self::new(status, err.to_string(), code)
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}
