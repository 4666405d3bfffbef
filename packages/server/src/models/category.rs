use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "Painting")]
    pub name: String,
    #[schema(example = "Works on canvas, paper or board")]
    pub description: String,
}

pub fn validate_create_category(payload: &CreateCategoryRequest) -> Result<(), AppError> {
    validate_name(&payload.name, "Name")?;
    if payload.description.trim().is_empty() {
        return Err(AppError::Validation("Description must not be empty".into()));
    }
    Ok(())
}

/// Update uses the same required fields as create (PUT semantics).
pub type UpdateCategoryRequest = CreateCategoryRequest;

/// Category list entry (id and name only, matching the list endpoint).
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Painting")]
    pub name: String,
}

/// Full category detail.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
}

impl From<crate::entity::category::Model> for CategoryResponse {
    fn from(model: crate::entity::category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}
