use sea_orm::*;
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::{account, admin, user};
use crate::utils::hash;

/// Ensure the configured bootstrap admin exists.
///
/// A fresh database has no admin, and only admins can build the taxonomy,
/// so startup seeds one account + profile + admin-membership row from
/// config. Re-running against an existing database is a no-op.
pub async fn seed_bootstrap_admin(
    db: &DatabaseConnection,
    auth: &AuthConfig,
) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&auth.admin_email, &auth.admin_password) else {
        return Ok(());
    };

    if account::Entity::find()
        .filter(account::Column::Email.eq(email))
        .one(db)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let password_hash = hash::hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash bootstrap admin password: {e}"))?;

    let txn = db.begin().await?;

    let created = match (account::ActiveModel {
        email: Set(email.clone()),
        password: Set(password_hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    })
    .insert(&txn)
    .await
    {
        Ok(model) => model,
        // Another instance seeded concurrently.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    user::ActiveModel {
        id: Set(created.id),
        username: Set("admin".to_string()),
        avatar_url: Set(None),
    }
    .insert(&txn)
    .await?;

    admin::ActiveModel {
        id: Set(created.id),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!("Seeded bootstrap admin account '{}'", email);
    Ok(())
}
