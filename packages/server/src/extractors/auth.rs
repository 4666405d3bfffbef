use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::models::auth::{Identity, Role};
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated caller extracted from the `Authorization: Bearer <token>`
/// header.
///
/// Declaring this as a handler parameter is what makes a route protected;
/// there is no per-handler header parsing anywhere else. Authorization
/// policy checks are the `require_*` methods below, evaluated after the
/// resource has been fetched (existence precedes authorization).
pub struct AuthUser {
    pub id: i32,
    pub role: Role,
}

impl AuthUser {
    /// Admin-only actions (taxonomy administration).
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Actions permitted to the owning user or any admin (delete post,
    /// delete comment).
    pub fn require_owner_or_admin(&self, owner_id: i32) -> Result<(), AppError> {
        if self.id == owner_id || self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Actions reserved for regular users: admins do not publish content.
    pub fn require_regular_user(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Err(AppError::PermissionDenied)
        } else {
            Ok(())
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let app = AppState::from_ref(state);
        let Identity { id, role } = jwt::verify(token, &app.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser { id, role })
    }
}
