use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Role of an authenticated caller.
///
/// Derived at login from admin membership and frozen into the token; never
/// stored on the session subject itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// The token claim payload: who the caller is for the token's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i32,
    pub role: Role,
}

/// Request body for account registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Email address, unique per account.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// Public profile name.
    #[schema(example = "alice")]
    pub username: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    let email = payload.email.trim();
    if email.is_empty() || email.chars().count() > 254 || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    Ok(())
}

/// Request body for login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    /// ID of the newly created account.
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Bearer token; lifetime is configured (128 hours by default).
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub role: Role,
    #[schema(example = 42)]
    pub id: i32,
}

/// Current authenticated caller.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    pub role: Role,
}
