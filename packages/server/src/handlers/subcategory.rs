use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{category, subcategory, tag};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::subcategory::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Subcategories",
    operation_id = "createSubcategory",
    summary = "Create a subcategory",
    description = "Creates a subcategory within a category. Admin only. Names are unique within their category; the per-category subcategory ID is assigned inside the transaction.",
    request_body = CreateSubcategoryRequest,
    responses(
        (status = 201, description = "Subcategory created", body = SubcategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name already used in this category (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(category_id = payload.category_id, name = %payload.name))]
pub async fn create_subcategory(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubcategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_subcategory(&payload)?;

    let name = payload.name.trim().to_string();

    let txn = state.db.begin().await?;

    category::Entity::find_by_id(payload.category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    let duplicate = subcategory::Entity::find()
        .filter(subcategory::Column::CategoryId.eq(payload.category_id))
        .filter(subcategory::Column::Name.eq(&name))
        .one(&txn)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "A subcategory with that name already exists in this category".into(),
        ));
    }

    let next_id = next_subcategory_id(&txn, payload.category_id).await?;

    let model = subcategory::ActiveModel {
        category_id: Set(payload.category_id),
        subcategory_id: Set(next_id),
        name: Set(name),
        history: Set(payload.history),
        characteristics: Set(payload.characteristics),
        requirements: Set(payload.requirements),
        tutorials: Set(payload.tutorials),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(SubcategoryResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Subcategories",
    operation_id = "listSubcategories",
    summary = "List all subcategories",
    responses(
        (status = 200, description = "Subcategories", body = Vec<SubcategoryListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_subcategories(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubcategoryListItem>>, AppError> {
    let items = subcategory::Entity::find()
        .order_by_asc(subcategory::Column::CategoryId)
        .order_by_asc(subcategory::Column::SubcategoryId)
        .all(&state.db)
        .await?
        .into_iter()
        .map(SubcategoryListItem::from)
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/category/{category_id}",
    tag = "Subcategories",
    operation_id = "listSubcategoriesByCategory",
    summary = "List the subcategories of one category",
    params(("category_id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Subcategories", body = Vec<SubcategoryListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(category_id))]
pub async fn list_subcategories_by_category(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> Result<Json<Vec<SubcategoryListItem>>, AppError> {
    category::Entity::find_by_id(category_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    let items = subcategory::Entity::find()
        .filter(subcategory::Column::CategoryId.eq(category_id))
        .order_by_asc(subcategory::Column::SubcategoryId)
        .all(&state.db)
        .await?
        .into_iter()
        .map(SubcategoryListItem::from)
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/{category_id}/{subcategory_id}",
    tag = "Subcategories",
    operation_id = "getSubcategory",
    summary = "Get a subcategory",
    params(
        ("category_id" = i32, Path, description = "Category ID"),
        ("subcategory_id" = i32, Path, description = "Subcategory ID within the category"),
    ),
    responses(
        (status = 200, description = "Subcategory detail", body = SubcategoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Subcategory not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(category_id, subcategory_id))]
pub async fn get_subcategory(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path((category_id, subcategory_id)): Path<(i32, i32)>,
) -> Result<Json<SubcategoryResponse>, AppError> {
    let model = find_subcategory(&state.db, category_id, subcategory_id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{category_id}/{subcategory_id}",
    tag = "Subcategories",
    operation_id = "updateSubcategory",
    summary = "Update a subcategory",
    description = "Replaces the subcategory's fields. Admin only.",
    params(
        ("category_id" = i32, Path, description = "Category ID"),
        ("subcategory_id" = i32, Path, description = "Subcategory ID within the category"),
    ),
    request_body = UpdateSubcategoryRequest,
    responses(
        (status = 200, description = "Subcategory updated", body = SubcategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Subcategory not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(category_id, subcategory_id))]
pub async fn update_subcategory(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((category_id, subcategory_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdateSubcategoryRequest>,
) -> Result<Json<SubcategoryResponse>, AppError> {
    auth_user.require_admin()?;
    validate_update_subcategory(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_subcategory(&txn, category_id, subcategory_id).await?;
    let mut active: subcategory::ActiveModel = existing.into();
    active.name = Set(payload.name.trim().to_string());
    active.history = Set(payload.history);
    active.characteristics = Set(payload.characteristics);
    active.requirements = Set(payload.requirements);
    active.tutorials = Set(payload.tutorials);

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{category_id}/{subcategory_id}",
    tag = "Subcategories",
    operation_id = "deleteSubcategory",
    summary = "Delete a subcategory",
    description = "Admin only. Returns 409 CONFLICT while tags still reference the subcategory.",
    params(
        ("category_id" = i32, Path, description = "Category ID"),
        ("subcategory_id" = i32, Path, description = "Subcategory ID within the category"),
    ),
    responses(
        (status = 204, description = "Subcategory deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Subcategory not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Subcategory still referenced (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(category_id, subcategory_id))]
pub async fn delete_subcategory(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((category_id, subcategory_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    let model = find_subcategory(&txn, category_id, subcategory_id).await?;

    let tag_count = tag::Entity::find()
        .filter(tag::Column::CategoryId.eq(category_id))
        .filter(tag::Column::SubcategoryId.eq(subcategory_id))
        .count(&txn)
        .await?;
    if tag_count > 0 {
        return Err(AppError::Conflict(
            "Cannot delete a subcategory that still has tags".into(),
        ));
    }

    let active: subcategory::ActiveModel = model.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_subcategory<C: ConnectionTrait>(
    db: &C,
    category_id: i32,
    subcategory_id: i32,
) -> Result<subcategory::Model, AppError> {
    subcategory::Entity::find_by_id((category_id, subcategory_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Subcategory not found".into()))
}

/// Compute the next per-category subcategory ID.
async fn next_subcategory_id<C: ConnectionTrait>(
    db: &C,
    category_id: i32,
) -> Result<i32, AppError> {
    let max_id: Option<i32> = subcategory::Entity::find()
        .filter(subcategory::Column::CategoryId.eq(category_id))
        .select_only()
        .column_as(subcategory::Column::SubcategoryId.max(), "max_id")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_id
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Subcategory ID overflow".into()))
}
