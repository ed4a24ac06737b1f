//! First-run setup: create the initial administrator on an empty database.

use sitebook_core::roles::Role;
use sitebook_db::models::user::CreateUser;
use sitebook_db::repositories::UserRepo;
use sitebook_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::InitialAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured administrator unless an active admin already
/// exists. Returns `true` when a user was created.
pub async fn ensure_initial_admin(pool: &DbPool, admin: &InitialAdmin) -> AppResult<bool> {
    if UserRepo::active_admin_exists(pool, Role::Admin.id()).await? {
        return Ok(false);
    }
    if UserRepo::find_by_email(pool, &admin.email).await?.is_some() {
        tracing::warn!(email = %admin.email, "Initial admin email is taken by a non-admin user");
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: admin.email.clone(),
            full_name: admin.full_name.clone(),
            password_hash,
            role_id: Role::Admin.id(),
            position: None,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "Created initial administrator");
    Ok(true)
}
