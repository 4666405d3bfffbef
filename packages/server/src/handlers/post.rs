use std::collections::HashSet;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, Query as SeaQuery, SelectStatement};
use sea_orm::*;
use tracing::instrument;

use crate::engagement::{self, EngagementKind, ToggleState};
use crate::entity::{account, category, comment, post, post_like, post_save, subcategory, tag, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::post::*;
use crate::models::shared::{Pagination, escape_like};
use crate::state::AppState;

/// Body limit layer for the image upload route (32MB).
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(32 * 1024 * 1024)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Posts",
    operation_id = "createPost",
    summary = "Publish a post",
    description = "Creates a post from a multipart body: required `file` (the image), optional `description` and `tag_id` fields. Only regular users publish; admins are rejected. The image is stored first and its public URL is persisted on the post.",
    request_body(content_type = "multipart/form-data", description = "Image plus optional description/tag_id fields"),
    responses(
        (status = 201, description = "Post created", body = CreatePostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Admins cannot publish (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Referenced tag does not exist (INVALID_REFERENCE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.id))]
pub async fn create_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_regular_user()?;

    let mut file: Option<(Vec<u8>, String)> = None;
    let mut description: Option<String> = None;
    let mut tag_id: Option<i32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((bytes.to_vec(), name));
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read field: {e}")))?;
                if !text.trim().is_empty() {
                    description = Some(text);
                }
            }
            Some("tag_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read field: {e}")))?;
                if !text.trim().is_empty() {
                    tag_id = Some(text.trim().parse().map_err(|_| {
                        AppError::Validation("tag_id must be an integer".into())
                    })?);
                }
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (bytes, file_name) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    if let Some(tag_id) = tag_id {
        tag::Entity::find_by_id(tag_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::InvalidReference("Tag not found".into()))?;
    }

    let stored = state.media.upload(&bytes, &file_name).await?;
    let media_url = super::public_media_url(&state.config, &stored);

    let model = post::ActiveModel {
        user_id: Set(auth_user.id),
        media_url: Set(media_url),
        description: Set(description),
        tag_id: Set(tag_id),
        like_count: Set(0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            id: model.id,
            media_url: model.media_url,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Posts",
    operation_id = "listPosts",
    summary = "List posts, newest first",
    description = "Paginated feed with the requesting user's `liked`/`saved` flags on every entry.",
    params(PostListQuery),
    responses(
        (status = 200, description = "Posts", body = PostListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.id))]
pub async fn list_posts(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let select = post::Entity::find();
    paginated_feed(&state.db, select, auth_user.id, query.page, query.per_page).await
}

#[utoipa::path(
    get,
    path = "/mine",
    tag = "Posts",
    operation_id = "listMyPosts",
    summary = "List the authenticated user's own posts",
    params(PostListQuery),
    responses(
        (status = 200, description = "Posts", body = PostListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.id))]
pub async fn list_my_posts(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let select = post::Entity::find().filter(post::Column::UserId.eq(auth_user.id));
    paginated_feed(&state.db, select, auth_user.id, query.page, query.per_page).await
}

#[utoipa::path(
    get,
    path = "/saved",
    tag = "Posts",
    operation_id = "listSavedPosts",
    summary = "List posts the authenticated user has saved",
    params(PostListQuery),
    responses(
        (status = 200, description = "Posts", body = PostListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.id))]
pub async fn list_saved_posts(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let select = post::Entity::find().filter(
        post::Column::Id.in_subquery(
            SeaQuery::select()
                .column(post_save::Column::PostId)
                .from(post_save::Entity)
                .and_where(post_save::Column::UserId.eq(auth_user.id))
                .to_owned(),
        ),
    );
    paginated_feed(&state.db, select, auth_user.id, query.page, query.per_page).await
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Posts",
    operation_id = "searchPosts",
    summary = "Search posts",
    description = "Case-insensitive substring search across category name, subcategory name, post description, author username and author email.",
    params(PostSearchQuery),
    responses(
        (status = 200, description = "Matching posts", body = PostListResponse),
        (status = 400, description = "Missing search term (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.id))]
pub async fn search_posts(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PostSearchQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let term = query.q.as_deref().unwrap_or("").trim().to_string();
    if term.is_empty() {
        return Err(AppError::Validation("A search term is required".into()));
    }

    let pattern = format!("%{}%", escape_like(&term).to_lowercase());

    let select = post::Entity::find().filter(
        Condition::any()
            .add(
                Expr::expr(Func::lower(Expr::col(post::Column::Description)))
                    .like(LikeExpr::new(&pattern).escape('\\')),
            )
            .add(post::Column::UserId.in_subquery(username_match_subquery(&pattern)))
            .add(post::Column::UserId.in_subquery(email_match_subquery(&pattern)))
            .add(post::Column::TagId.in_subquery(tag_by_category_subquery(&pattern)))
            .add(post::Column::TagId.in_subquery(tag_by_subcategory_subquery(&pattern))),
    );

    paginated_feed(&state.db, select, auth_user.id, query.page, query.per_page).await
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Posts",
    operation_id = "getPost",
    summary = "Get a post by ID",
    description = "Full detail including description, like count and the requesting user's engagement flags.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post detail", body = PostResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostResponse>, AppError> {
    let (model, tag) = post::Entity::find_by_id(id)
        .find_also_related(tag::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    let (liked, saved) = engagement_flags(&state.db, auth_user.id, &[model.id]).await?;

    Ok(Json(PostResponse::build(
        model.clone(),
        tag,
        liked.contains(&model.id),
        saved.contains(&model.id),
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Posts",
    operation_id = "deletePost",
    summary = "Delete a post",
    description = "Allowed for the post's owner or an admin. Likes, saves and comments are removed in the same transaction; the stored image is deleted best-effort afterwards.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let model = find_post_for_update(&txn, id).await?;
    auth_user.require_owner_or_admin(model.user_id)?;

    post_like::Entity::delete_many()
        .filter(post_like::Column::PostId.eq(id))
        .exec(&txn)
        .await?;
    post_save::Entity::delete_many()
        .filter(post_save::Column::PostId.eq(id))
        .exec(&txn)
        .await?;
    comment::Entity::delete_many()
        .filter(comment::Column::PostId.eq(id))
        .exec(&txn)
        .await?;
    post::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    // The row is gone either way; losing the file only leaks disk space.
    if let Some(stored) = model.media_url.rsplit('/').next() {
        if let Err(e) = state.media.delete(stored).await {
            tracing::warn!("Failed to delete media file '{}': {}", stored, e);
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/like",
    tag = "Posts",
    operation_id = "togglePostLike",
    summary = "Toggle a like on a post",
    description = "First call by a user likes the post (201, state `active`); the next call removes the like (200, state `inactive`), and so on. Safe under concurrent calls: the store's uniqueness constraint on the (user, post) pair is the only synchronization.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 201, description = "Like added", body = ToggleResponse),
        (status = 200, description = "Like removed", body = ToggleResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post does not exist (INVALID_REFERENCE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id, id))]
pub async fn toggle_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    toggle_response(engagement::toggle(&state.db, EngagementKind::Like, auth_user.id, id).await?)
}

#[utoipa::path(
    post,
    path = "/{id}/save",
    tag = "Posts",
    operation_id = "togglePostSave",
    summary = "Toggle a bookmark on a post",
    description = "Same flip semantics as the like toggle, against the save relation.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 201, description = "Post saved", body = ToggleResponse),
        (status = 200, description = "Save removed", body = ToggleResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post does not exist (INVALID_REFERENCE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id, id))]
pub async fn toggle_save(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    toggle_response(engagement::toggle(&state.db, EngagementKind::Save, auth_user.id, id).await?)
}

fn toggle_response(state: ToggleState) -> Result<(StatusCode, Json<ToggleResponse>), AppError> {
    let status = match state {
        ToggleState::Active => StatusCode::CREATED,
        ToggleState::Inactive => StatusCode::OK,
    };
    Ok((status, Json(ToggleResponse { state })))
}

/// Run a post query as a newest-first paginated feed with per-viewer
/// engagement flags.
async fn paginated_feed(
    db: &DatabaseConnection,
    select: Select<post::Entity>,
    viewer_id: i32,
    page: Option<u64>,
    per_page: Option<u64>,
) -> Result<Json<PostListResponse>, AppError> {
    let page = Ord::max(page.unwrap_or(1), 1);
    let per_page = per_page.unwrap_or(20).clamp(1, 100);

    let total = select
        .clone()
        .paginate(db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let rows = select
        .order_by_desc(post::Column::CreatedAt)
        .find_also_related(tag::Entity)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(db)
        .await?;

    let ids: Vec<i32> = rows.iter().map(|(p, _)| p.id).collect();
    let (liked, saved) = engagement_flags(db, viewer_id, &ids).await?;

    let data = rows
        .into_iter()
        .map(|(p, t)| {
            let flags = (liked.contains(&p.id), saved.contains(&p.id));
            PostListItem::build(p, t, flags.0, flags.1)
        })
        .collect();

    Ok(Json(PostListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// Which of `post_ids` the viewer has liked and saved.
async fn engagement_flags(
    db: &DatabaseConnection,
    viewer_id: i32,
    post_ids: &[i32],
) -> Result<(HashSet<i32>, HashSet<i32>), AppError> {
    if post_ids.is_empty() {
        return Ok((HashSet::new(), HashSet::new()));
    }

    let liked: HashSet<i32> = post_like::Entity::find()
        .filter(post_like::Column::UserId.eq(viewer_id))
        .filter(post_like::Column::PostId.is_in(post_ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.post_id)
        .collect();

    let saved: HashSet<i32> = post_save::Entity::find()
        .filter(post_save::Column::UserId.eq(viewer_id))
        .filter(post_save::Column::PostId.is_in(post_ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.post_id)
        .collect();

    Ok((liked, saved))
}

async fn find_post_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<post::Model, AppError> {
    use sea_orm::sea_query::LockType;
    post::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

fn username_match_subquery(pattern: &str) -> SelectStatement {
    SeaQuery::select()
        .column(user::Column::Id)
        .from(user::Entity)
        .and_where(
            Expr::expr(Func::lower(Expr::col(user::Column::Username)))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
        .to_owned()
}

fn email_match_subquery(pattern: &str) -> SelectStatement {
    SeaQuery::select()
        .column(account::Column::Id)
        .from(account::Entity)
        .and_where(
            Expr::expr(Func::lower(Expr::col(account::Column::Email)))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
        .to_owned()
}

fn tag_by_category_subquery(pattern: &str) -> SelectStatement {
    SeaQuery::select()
        .column(tag::Column::Id)
        .from(tag::Entity)
        .and_where(
            tag::Column::CategoryId.in_subquery(
                SeaQuery::select()
                    .column(category::Column::Id)
                    .from(category::Entity)
                    .and_where(
                        Expr::expr(Func::lower(Expr::col(category::Column::Name)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    )
                    .to_owned(),
            ),
        )
        .to_owned()
}

fn tag_by_subcategory_subquery(pattern: &str) -> SelectStatement {
    SeaQuery::select()
        .column((tag::Entity, tag::Column::Id))
        .from(tag::Entity)
        .inner_join(
            subcategory::Entity,
            Expr::col((tag::Entity, tag::Column::CategoryId))
                .equals((subcategory::Entity, subcategory::Column::CategoryId))
                .and(
                    Expr::col((tag::Entity, tag::Column::SubcategoryId))
                        .equals((subcategory::Entity, subcategory::Column::SubcategoryId)),
                ),
        )
        .and_where(
            Expr::expr(Func::lower(Expr::col((
                subcategory::Entity,
                subcategory::Column::Name,
            ))))
            .like(LikeExpr::new(pattern).escape('\\')),
        )
        .to_owned()
}
