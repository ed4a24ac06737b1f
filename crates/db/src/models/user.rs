//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sitebook_core::roles::Role;
use sitebook_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row of `users`.
///
/// Not `Serialize`: it carries the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role_id: i16,
    pub position: Option<String>,
    pub is_active: bool,
    /// Bumped to invalidate every access token issued so far.
    pub token_version: i32,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Resolve `role_id` against the fixed role set.
    pub fn role(&self) -> Option<Role> {
        Role::from_id(self.role_id).ok()
    }
}

/// What the API shows of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    /// Resolved role name (e.g. `"admin"`, `"manager"`).
    pub role: String,
    pub role_id: i16,
    pub position: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user
                .role()
                .map(|r| r.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            role_id: user.role_id,
            position: user.position.clone(),
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Short user reference embedded in team lists and reports.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub position: Option<String>,
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role_id: i16,
    pub position: Option<String>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub role_id: Option<i16>,
    pub is_active: Option<bool>,
}

/// Filters for the user listing.
#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}
