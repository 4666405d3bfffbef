use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};

use crate::engagement::ToggleState;
use crate::entity::{post, tag};
use crate::models::shared::Pagination;

/// Query parameters for post listings.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PostListQuery {
    /// Page number, 1-based.
    pub page: Option<u64>,
    /// Items per page (max 100).
    pub per_page: Option<u64>,
}

/// Query parameters for post search.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PostSearchQuery {
    /// Search term, matched as a substring against category, subcategory,
    /// description, username and email.
    pub q: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Post as it appears in feeds, with the viewer's engagement flags.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PostListItem {
    pub id: i32,
    pub media_url: String,
    pub tag_id: Option<i32>,
    pub tag_name: Option<String>,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    /// Whether the requesting user has liked this post.
    pub liked: bool,
    /// Whether the requesting user has saved this post.
    pub saved: bool,
    pub user_id: i32,
}

impl PostListItem {
    pub fn build(
        post: post::Model,
        tag: Option<tag::Model>,
        liked: bool,
        saved: bool,
    ) -> Self {
        Self {
            id: post.id,
            media_url: post.media_url,
            tag_id: post.tag_id,
            tag_name: tag.as_ref().map(|t| t.name.clone()),
            category_id: tag.as_ref().map(|t| t.category_id),
            subcategory_id: tag.as_ref().and_then(|t| t.subcategory_id),
            liked,
            saved,
            user_id: post.user_id,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostListResponse {
    pub data: Vec<PostListItem>,
    pub pagination: Pagination,
}

/// Full post detail, with the viewer's engagement flags.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub media_url: String,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub like_count: i32,
    pub tag_id: Option<i32>,
    pub tag_name: Option<String>,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    pub liked: bool,
    pub saved: bool,
    pub user_id: i32,
}

impl PostResponse {
    pub fn build(
        post: post::Model,
        tag: Option<tag::Model>,
        liked: bool,
        saved: bool,
    ) -> Self {
        Self {
            id: post.id,
            media_url: post.media_url,
            description: post.description,
            created_at: post.created_at,
            like_count: post.like_count,
            tag_id: post.tag_id,
            tag_name: tag.as_ref().map(|t| t.name.clone()),
            category_id: tag.as_ref().map(|t| t.category_id),
            subcategory_id: tag.as_ref().and_then(|t| t.subcategory_id),
            liked,
            saved,
            user_id: post.user_id,
        }
    }
}

/// Response after creating a post.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CreatePostResponse {
    pub id: i32,
    pub media_url: String,
}

/// Result of a like/save toggle.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ToggleResponse {
    /// `active` if this call created the relation, `inactive` if it
    /// removed it.
    pub state: ToggleState,
}
