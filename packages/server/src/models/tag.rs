use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTagRequest {
    #[schema(example = "portrait")]
    pub name: String,
    #[schema(example = 1)]
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
}

pub fn validate_create_tag(payload: &CreateTagRequest) -> Result<(), AppError> {
    validate_name(&payload.name, "Name")
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TagListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "portrait")]
    pub name: String,
}

/// Full tag detail.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
}

impl From<crate::entity::tag::Model> for TagResponse {
    fn from(model: crate::entity::tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
        }
    }
}
