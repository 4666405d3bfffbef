//! Like/save toggle engine.
//!
//! Both relations flip on each call by the same user on the same post. The
//! store's uniqueness constraint on `(user_id, post_id)` is the only
//! synchronization mechanism: the engine inserts first and interprets the
//! outcome, so two concurrent toggles can never both observe "absent" the
//! way a check-then-insert would.

use sea_orm::prelude::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};
use serde::Serialize;

use crate::entity::{post, post_like, post_save};
use crate::error::AppError;

/// Which engagement relation a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementKind {
    Like,
    Save,
}

/// State of the relation after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    /// The relation row now exists (this call created it).
    Active,
    /// The relation row no longer exists (this call removed it).
    Inactive,
}

/// Typed outcome of the pair-insert attempt.
///
/// Handlers and the toggle logic below never match on a store-specific
/// error code; classification happens here, once.
enum InsertOutcome {
    Inserted,
    /// The uniqueness constraint fired: the pair already exists.
    Duplicate,
    /// A foreign-key target (the post, or the user) does not exist.
    MissingTarget,
    Other(DbErr),
}

fn classify(result: Result<(), DbErr>) -> InsertOutcome {
    match result {
        Ok(()) => InsertOutcome::Inserted,
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => InsertOutcome::Duplicate,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => InsertOutcome::MissingTarget,
            _ => InsertOutcome::Other(e),
        },
    }
}

/// Flip the relation for `(user_id, post_id)`.
///
/// Returns the state the relation is in after this call. A toggle against a
/// nonexistent post surfaces as `InvalidReference` with no row created.
pub async fn toggle(
    db: &DatabaseConnection,
    kind: EngagementKind,
    user_id: i32,
    post_id: i32,
) -> Result<ToggleState, AppError> {
    let txn = db.begin().await?;

    match classify(insert_pair(&txn, kind, user_id, post_id).await) {
        InsertOutcome::Inserted => {
            if kind == EngagementKind::Like {
                bump_like_count(&txn, post_id, 1).await?;
            }
            txn.commit().await?;
            Ok(ToggleState::Active)
        }
        InsertOutcome::Duplicate => {
            // The failed insert aborted this transaction; the delete needs
            // a fresh one.
            txn.rollback().await?;

            let txn = db.begin().await?;
            let deleted = delete_pair(&txn, kind, user_id, post_id).await?;
            // A concurrent toggle may have deleted the row first; only
            // adjust the counter for the toggle that actually removed it.
            if deleted > 0 && kind == EngagementKind::Like {
                bump_like_count(&txn, post_id, -1).await?;
            }
            txn.commit().await?;
            Ok(ToggleState::Inactive)
        }
        InsertOutcome::MissingTarget => {
            Err(AppError::InvalidReference("Post not found".into()))
        }
        InsertOutcome::Other(e) => Err(e.into()),
    }
}

async fn insert_pair<C: ConnectionTrait>(
    db: &C,
    kind: EngagementKind,
    user_id: i32,
    post_id: i32,
) -> Result<(), DbErr> {
    let now = chrono::Utc::now();
    match kind {
        EngagementKind::Like => {
            post_like::ActiveModel {
                user_id: Set(user_id),
                post_id: Set(post_id),
                created_at: Set(now),
            }
            .insert(db)
            .await?;
        }
        EngagementKind::Save => {
            post_save::ActiveModel {
                user_id: Set(user_id),
                post_id: Set(post_id),
                created_at: Set(now),
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

async fn delete_pair<C: ConnectionTrait>(
    db: &C,
    kind: EngagementKind,
    user_id: i32,
    post_id: i32,
) -> Result<u64, DbErr> {
    let result = match kind {
        EngagementKind::Like => {
            post_like::Entity::delete_many()
                .filter(post_like::Column::UserId.eq(user_id))
                .filter(post_like::Column::PostId.eq(post_id))
                .exec(db)
                .await?
        }
        EngagementKind::Save => {
            post_save::Entity::delete_many()
                .filter(post_save::Column::UserId.eq(user_id))
                .filter(post_save::Column::PostId.eq(post_id))
                .exec(db)
                .await?
        }
    };
    Ok(result.rows_affected)
}

/// Adjust the denormalized like counter on the post.
async fn bump_like_count<C: ConnectionTrait>(db: &C, post_id: i32, delta: i32) -> Result<(), DbErr> {
    post::Entity::update_many()
        .col_expr(
            post::Column::LikeCount,
            Expr::col(post::Column::LikeCount).add(delta),
        )
        .filter(post::Column::Id.eq(post_id))
        .exec(db)
        .await?;
    Ok(())
}
