use axum::extract::{Multipart, State};
use axum::{Json, response::IntoResponse};
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::user::{
    AvatarResponse, ProfileResponse, UpdateUsernameRequest, validate_update_username,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "User",
    operation_id = "getProfile",
    summary = "Get the authenticated user's profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn get_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = find_profile(&state.db, auth_user.id).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    put,
    path = "/username",
    tag = "User",
    operation_id = "updateUsername",
    summary = "Change the authenticated user's username",
    request_body = UpdateUsernameRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.id))]
pub async fn update_username(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateUsernameRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    validate_update_username(&payload)?;

    let profile = find_profile(&state.db, auth_user.id).await?;
    let mut active: user::ActiveModel = profile.into();
    active.username = Set(payload.username.trim().to_string());

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/avatar",
    tag = "User",
    operation_id = "updateAvatar",
    summary = "Upload a new profile picture",
    description = "Accepts a `file` multipart field, stores it, and persists the resulting public URL on the profile.",
    request_body(content_type = "multipart/form-data", description = "Image file upload"),
    responses(
        (status = 200, description = "Avatar updated", body = AvatarResponse),
        (status = 400, description = "Missing or oversized file (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.id))]
pub async fn update_avatar(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let profile = find_profile(&state.db, auth_user.id).await?;

    let upload = super::read_file_field(multipart).await?;
    let stored = state
        .media
        .upload(&upload.bytes, &upload.file_name)
        .await?;
    let avatar_url = super::public_media_url(&state.config, &stored);

    let mut active: user::ActiveModel = profile.into();
    active.avatar_url = Set(Some(avatar_url.clone()));
    active.update(&state.db).await?;

    Ok(Json(AvatarResponse { avatar_url }))
}

async fn find_profile<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
