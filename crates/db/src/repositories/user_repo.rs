//! Repository for the `users` table.

use sitebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User, UserSummary};

const COLUMNS: &str = "id, email, full_name, password_hash, role_id, position, is_active, \
                        token_version, last_login_at, created_at, updated_at";

/// Accounts, roles and the token-version counter.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user. The email must already be normalized.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, full_name, password_hash, role_id, position)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .bind(&input.position)
            .fetch_one(pool)
            .await
    }

    /// Look up one user, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users ordered by name, optionally restricted to one role.
    pub async fn list(
        pool: &PgPool,
        role_id: Option<i16>,
        include_inactive: bool,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::SMALLINT IS NULL OR role_id = $1)
               AND ($2 OR is_active)
             ORDER BY full_name, id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(role_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Active users holding any of `role_ids`, as summaries ordered by name.
    pub async fn list_active_by_roles(
        pool: &PgPool,
        role_ids: &[i16],
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT u.id, u.full_name, u.email, r.name AS role, u.position
             FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.is_active AND u.role_id = ANY($1)
             ORDER BY u.full_name, u.id",
        )
        .bind(role_ids)
        .fetch_all(pool)
        .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// A role change or deactivation also bumps `token_version`, so the
    /// user's existing tokens stop working immediately.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                position = COALESCE($4, position),
                role_id = COALESCE($5, role_id),
                is_active = COALESCE($6, is_active),
                token_version = CASE
                    WHEN ($5::SMALLINT IS NOT NULL AND $5 <> role_id)
                      OR ($6::BOOLEAN IS NOT NULL AND $6 = false AND is_active)
                    THEN token_version + 1
                    ELSE token_version
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.position)
            .bind(input.role_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's password hash and invalidate their tokens.
    /// Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, token_version = token_version + 1 WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the session-invalidation counter. Returns the new value,
    /// or `None` if the user does not exist.
    pub async fn bump_token_version(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            "UPDATE users SET token_version = token_version + 1 WHERE id = $1
             RETURNING token_version",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Whether at least one active admin exists.
    pub async fn active_admin_exists(pool: &PgPool, admin_role_id: i16) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM users WHERE role_id = $1 AND is_active)",
        )
        .bind(admin_role_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Permanently delete a user. Fails with a foreign-key violation while
    /// the user still manages projects. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
