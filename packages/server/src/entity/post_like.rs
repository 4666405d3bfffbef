use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// "User likes post" relation.
///
/// The composite primary key doubles as the uniqueness constraint the
/// engagement toggle engine relies on: at most one row per (user, post)
/// pair, enforced by the store across concurrent transactions.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post_like")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub user_id: i32,
    #[sea_orm(primary_key)]
    pub post_id: i32,

    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,
    #[sea_orm(belongs_to, from = "post_id", to = "id")]
    pub post: BelongsTo<super::post::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
