//! Custom Axum extractors.
//!
//! Authentication happens upstream: the gateway forwards the caller as two headers.
//!
//! - `X-User-Id`: UUID of the signed-in user
//! - `X-User-Role`: `admin` or `super-admin` for staff, anything else (or nothing) for guests
//!
//! # Examples
//!
//! ```ignore
//! use hotel_booking_web::extractors::{Actor, AdminActor};
//!
//! async fn my_bookings(actor: Actor) -> Result<Json<Vec<Booking>>, AppError> { ... }
//!
//! async fn confirm(AdminActor(admin): AdminActor) -> Result<Json<Booking>, AppError> { ... }
//! ```

use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use hotel_booking_core::UserId;
use uuid::Uuid;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Role of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Regular signed-in user
    Guest,
    /// Hotel staff
    Admin,
    /// Platform staff
    SuperAdmin,
}

impl Role {
    /// Parses the role header; unknown values are guests.
    #[must_use]
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "super-admin" | "super_admin" => Self::SuperAdmin,
            _ => Self::Guest,
        }
    }

    /// Whether the role may use admin operations
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

/// Signed-in caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User id
    pub user_id: UserId,
    /// Role
    pub role: Role,
}

impl Actor {
    /// Whether the caller may see or act on records owned by `owner`
    #[must_use]
    pub fn can_access(&self, owner: UserId) -> bool {
        self.role.is_admin() || self.user_id == owner
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(UserId::from_uuid)
            .ok_or_else(|| AppError::unauthorized("Sign in to continue"))?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map_or(Role::Guest, Role::from_header);

        Ok(Self { user_id, role })
    }
}

/// Signed-in caller with an admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for AdminActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let actor = Actor::from_request_parts(parts, state).await?;
        if !actor.role.is_admin() {
            tracing::warn!(user_id = %actor.user_id, "Admin operation refused");
            return Err(AppError::forbidden("Admin access required"));
        }
        Ok(Self(actor))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use axum::http::Request;

    async fn extract<T>(headers: &[(&str, &str)]) -> Result<T, AppError>
    where
        T: FromRequestParts<(), Rejection = AppError>,
    {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        T::from_request_parts(&mut parts, &()).await
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_header("admin"), Role::Admin);
        assert_eq!(Role::from_header("Super-Admin"), Role::SuperAdmin);
        assert_eq!(Role::from_header("user"), Role::Guest);
        assert!(Role::SuperAdmin.is_admin());
        assert!(!Role::Guest.is_admin());
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let err = extract::<Actor>(&[]).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guest_cannot_act_as_admin() {
        let id = Uuid::new_v4().to_string();
        let actor = extract::<Actor>(&[(USER_ID_HEADER, &id)]).await.unwrap();
        assert_eq!(actor.role, Role::Guest);

        let err = extract::<AdminActor>(&[(USER_ID_HEADER, &id)])
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);

        let AdminActor(admin) =
            extract::<AdminActor>(&[(USER_ID_HEADER, &id), (USER_ROLE_HEADER, "admin")])
                .await
                .unwrap();
        assert!(admin.can_access(UserId::new()));
    }
}
