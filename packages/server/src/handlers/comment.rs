use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{comment, post, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::comment::{CommentResponse, CreateCommentRequest, validate_create_comment};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}/comments",
    tag = "Comments",
    operation_id = "listComments",
    summary = "List the comments on a post",
    description = "All comments, oldest first, with author usernames joined in.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments", body = Vec<CommentResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(post_id))]
pub async fn list_comments(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    find_post(&state.db, post_id).await?;

    let rows = comment::Entity::find()
        .filter(comment::Column::PostId.eq(post_id))
        .find_also_related(user::Entity)
        .order_by_asc(comment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .map(|(c, author)| CommentResponse {
            id: c.id,
            user_id: c.user_id,
            username: author.map(|u| u.username).unwrap_or_default(),
            content: c.content,
            created_at: c.created_at,
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/{id}/comments",
    tag = "Comments",
    operation_id = "createComment",
    summary = "Comment on a post",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.id, post_id))]
pub async fn create_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_comment(&payload)?;

    let txn = state.db.begin().await?;
    find_post(&txn, post_id).await?;

    let model = comment::ActiveModel {
        user_id: Set(auth_user.id),
        post_id: Set(post_id),
        content: Set(payload.content),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let author = user::Entity::find_by_id(auth_user.id).one(&txn).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            id: model.id,
            user_id: model.user_id,
            username: author.map(|u| u.username).unwrap_or_default(),
            content: model.content,
            created_at: model.created_at,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Comments",
    operation_id = "deleteComment",
    summary = "Delete a comment",
    description = "Allowed for the comment's author or an admin.",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id, id))]
pub async fn delete_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let model = comment::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    auth_user.require_owner_or_admin(model.user_id)?;

    let active: comment::ActiveModel = model.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_post<C: ConnectionTrait>(db: &C, id: i32) -> Result<post::Model, AppError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}
