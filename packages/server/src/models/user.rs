use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Public profile of the authenticated user.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "alice")]
    pub username: String,
    pub avatar_url: Option<String>,
}

impl From<crate::entity::user::Model> for ProfileResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            username: user.username,
            avatar_url: user.avatar_url,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateUsernameRequest {
    #[schema(example = "alice_draws")]
    pub username: String,
}

pub fn validate_update_username(payload: &UpdateUsernameRequest) -> Result<(), AppError> {
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    Ok(())
}

/// Response after an avatar upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AvatarResponse {
    pub avatar_url: String,
}
