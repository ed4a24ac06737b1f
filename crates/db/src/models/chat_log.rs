//! Assistant chat log model. Rows are append-only.

use serde::{Deserialize, Serialize};
use sitebook_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `chat_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatLog {
    pub id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub content: String,
    pub request_type: String,
    pub created_at: Timestamp,
}

/// Body of `POST /chat-log`. The author is always the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChatLog {
    pub role: String,
    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: String,
    #[validate(length(min = 1, max = 64, message = "Request type must be 1-64 characters"))]
    pub request_type: String,
}

/// Admin listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatLogFilter {
    pub user_id: Option<DbId>,
    pub request_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
