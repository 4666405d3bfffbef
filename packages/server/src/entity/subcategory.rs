use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subcategory of an art discipline.
///
/// `subcategory_id` is assigned per category (1, 2, 3, ... within each
/// `category_id`), so the pair forms the primary key.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subcategory")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub category_id: i32,
    #[sea_orm(primary_key)]
    pub subcategory_id: i32,

    pub name: String,
    pub history: Option<String>,
    pub characteristics: Option<String>,
    pub requirements: Option<String>,
    pub tutorials: Option<String>,

    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: Option<super::category::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
