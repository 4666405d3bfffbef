use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSubcategoryRequest {
    #[schema(example = 1)]
    pub category_id: i32,
    #[schema(example = "Watercolor")]
    pub name: String,
    pub history: Option<String>,
    pub characteristics: Option<String>,
    pub requirements: Option<String>,
    pub tutorials: Option<String>,
}

pub fn validate_create_subcategory(payload: &CreateSubcategoryRequest) -> Result<(), AppError> {
    validate_name(&payload.name, "Name")
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateSubcategoryRequest {
    #[schema(example = "Watercolor")]
    pub name: String,
    pub history: Option<String>,
    pub characteristics: Option<String>,
    pub requirements: Option<String>,
    pub tutorials: Option<String>,
}

pub fn validate_update_subcategory(payload: &UpdateSubcategoryRequest) -> Result<(), AppError> {
    validate_name(&payload.name, "Name")
}

/// Subcategory list entry.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubcategoryListItem {
    pub category_id: i32,
    pub subcategory_id: i32,
    pub name: String,
}

impl From<crate::entity::subcategory::Model> for SubcategoryListItem {
    fn from(model: crate::entity::subcategory::Model) -> Self {
        Self {
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
            name: model.name,
        }
    }
}

/// Full subcategory detail.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubcategoryResponse {
    pub category_id: i32,
    pub subcategory_id: i32,
    pub name: String,
    pub history: Option<String>,
    pub characteristics: Option<String>,
    pub requirements: Option<String>,
    pub tutorials: Option<String>,
}

impl From<crate::entity::subcategory::Model> for SubcategoryResponse {
    fn from(model: crate::entity::subcategory::Model) -> Self {
        Self {
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
            name: model.name,
            history: model.history,
            characteristics: model.characteristics,
            requirements: model.requirements,
            tutorials: model.tutorials,
        }
    }
}
