use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Public profile, 1:1 with an account (shared primary key).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub username: String,
    pub avatar_url: Option<String>,

    #[sea_orm(belongs_to, from = "id", to = "id")]
    pub account: BelongsTo<super::account::Entity>,

    #[sea_orm(has_many)]
    pub posts: HasMany<super::post::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::comment::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
