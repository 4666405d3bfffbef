use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCommentRequest {
    #[schema(example = "Love the brushwork on this one")]
    pub content: String,
}

pub fn validate_create_comment(payload: &CreateCommentRequest) -> Result<(), AppError> {
    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Content must not be empty".into()));
    }
    if payload.content.chars().count() > 2000 {
        return Err(AppError::Validation(
            "Content must be at most 2000 characters".into(),
        ));
    }
    Ok(())
}

/// Comment with its author's username joined in.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub user_id: i32,
    #[schema(example = "alice")]
    pub username: String,
    pub content: String,
    pub created_at: DateTimeUtc,
}
