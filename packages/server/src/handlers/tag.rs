use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, post, subcategory, tag};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::tag::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Tags",
    operation_id = "listTags",
    summary = "List all tags",
    responses(
        (status = 200, description = "Tags", body = Vec<TagListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_tags(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TagListItem>>, AppError> {
    let items = tag::Entity::find()
        .order_by_asc(tag::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| TagListItem {
            id: t.id,
            name: t.name,
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Tags",
    operation_id = "createTag",
    summary = "Create a tag",
    description = "Creates a tag under a category (and optionally one of its subcategories). Admin only.",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category or subcategory not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_tag(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_tag(&payload)?;

    let txn = state.db.begin().await?;

    category::Entity::find_by_id(payload.category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    if let Some(subcategory_id) = payload.subcategory_id {
        subcategory::Entity::find_by_id((payload.category_id, subcategory_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Subcategory not found".into()))?;
    }

    let model = tag::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        category_id: Set(payload.category_id),
        subcategory_id: Set(payload.subcategory_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TagResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Tags",
    operation_id = "deleteTag",
    summary = "Delete a tag",
    description = "Admin only. Returns 409 CONFLICT while posts still use the tag.",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Tag not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Tag still in use (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_tag(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;

    tag::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".into()))?;

    let post_count = post::Entity::find()
        .filter(post::Column::TagId.eq(id))
        .count(&txn)
        .await?;
    if post_count > 0 {
        return Err(AppError::Conflict(
            "Cannot delete a tag that is still used by posts".into(),
        ));
    }

    tag::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
