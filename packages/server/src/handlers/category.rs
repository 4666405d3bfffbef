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
use crate::models::category::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    description = "Creates an art category. Admin only. Category names are globally unique.",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Name already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_category(&payload)?;

    let name = payload.name.trim().to_string();

    let existing = category::Entity::find()
        .filter(category::Column::Name.eq(&name))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "A category with that name already exists".into(),
        ));
    }

    let new_category = category::ActiveModel {
        name: Set(name),
        description: Set(payload.description),
        ..Default::default()
    };

    // The unique column backstops the existence probe under concurrency.
    let model = match new_category.insert(&state.db).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Conflict(
                "A category with that name already exists".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List all categories",
    responses(
        (status = 200, description = "Categories", body = Vec<CategoryListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_categories(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryListItem>>, AppError> {
    let items = category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| CategoryListItem {
            id: c.id,
            name: c.name,
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    operation_id = "getCategory",
    summary = "Get a category by ID",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category detail", body = CategoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_category(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryResponse>, AppError> {
    let model = find_category(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Update a category",
    description = "Replaces the name and description. Admin only.",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    auth_user.require_admin()?;
    validate_create_category(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_category(&txn, id).await?;
    let mut active: category::ActiveModel = existing.into();
    active.name = Set(payload.name.trim().to_string());
    active.description = Set(payload.description);

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Admin only. Returns 409 CONFLICT while subcategories or tags still reference the category.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Category still referenced (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    find_category(&txn, id).await?;

    let subcategory_count = subcategory::Entity::find()
        .filter(subcategory::Column::CategoryId.eq(id))
        .count(&txn)
        .await?;
    if subcategory_count > 0 {
        return Err(AppError::Conflict(
            "Cannot delete a category that still has subcategories".into(),
        ));
    }

    let tag_count = tag::Entity::find()
        .filter(tag::Column::CategoryId.eq(id))
        .count(&txn)
        .await?;
    if tag_count > 0 {
        return Err(AppError::Conflict(
            "Cannot delete a category that still has tags".into(),
        ));
    }

    category::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_category<C: ConnectionTrait>(db: &C, id: i32) -> Result<category::Model, AppError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))
}
