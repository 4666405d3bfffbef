use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin membership: an account with a row here has the `admin` role.
///
/// Role is recomputed from this table at login and frozen into the token,
/// so membership changes never affect already-issued tokens.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    #[sea_orm(belongs_to, from = "id", to = "id")]
    pub account: BelongsTo<super::account::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
