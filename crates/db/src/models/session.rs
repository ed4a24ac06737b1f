//! Refresh-token sessions (`user_sessions`). Never sent to clients.

use sitebook_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    /// SHA-256 hex of the token handed to the client.
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    /// Set once the token has been exchanged, logged out or invalidated.
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
