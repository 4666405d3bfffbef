use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{account, admin, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    Identity, LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse, Role,
    validate_login_request, validate_register_request,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new account",
    description = "Creates an account and its public profile. Duplicate emails are detected via the store's unique constraint, so two concurrent registrations cannot both succeed.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let email = payload.email.trim().to_string();
    let username = payload.username.trim().to_string();

    let password_hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let txn = state.db.begin().await?;

    let new_account = account::ActiveModel {
        email: Set(email),
        password: Set(password_hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = match new_account.insert(&txn).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::EmailTaken);
        }
        Err(e) => return Err(e.into()),
    };

    let profile = user::ActiveModel {
        id: Set(created.id),
        username: Set(username),
        avatar_url: Set(None),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: created.id,
            username: profile.username,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in and receive a session token",
    description = "Verifies credentials and issues a signed token. The role (admin membership) is looked up here and frozen into the token; it is never re-read while the token is valid.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Bad credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let email = payload.email.trim();

    let account = account::Entity::find()
        .filter(account::Column::Email.eq(email))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &account.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let is_admin = admin::Entity::find_by_id(account.id)
        .one(&state.db)
        .await?
        .is_some();
    let role = if is_admin { Role::Admin } else { Role::User };

    let identity = Identity {
        id: account.id,
        role,
    };
    let token = jwt::sign(
        &identity,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        role,
        id: account.id,
    }))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Return the authenticated caller's identity",
    responses(
        (status = 200, description = "Caller identity", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.id))]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.id,
        role: auth_user.role,
    })
}
