use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,
    pub user_id: i32,

    pub media_url: String,
    pub description: Option<String>,

    #[sea_orm(belongs_to, from = "tag_id", to = "id")]
    pub tag: BelongsTo<Option<super::tag::Entity>>,
    pub tag_id: Option<i32>,

    /// Denormalized counter, maintained by the engagement toggle engine.
    pub like_count: i32,

    pub created_at: DateTimeUtc,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::comment::Entity>,

    #[sea_orm(has_many)]
    pub likes: HasMany<super::post_like::Entity>,

    #[sea_orm(has_many)]
    pub saves: HasMany<super::post_save::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
