//! Repository for the append-only `chat_logs` table.

use sitebook_core::pagination::Page;
use sitebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::chat_log::ChatLog;

const COLUMNS: &str = "id, user_id, role, content, request_type, created_at";

/// Insert and read operations for chat logs. There is no update or delete.
pub struct ChatLogRepo;

impl ChatLogRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        role: &str,
        content: &str,
        request_type: &str,
    ) -> Result<ChatLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_logs (user_id, role, content, request_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatLog>(&query)
            .bind(user_id)
            .bind(role)
            .bind(content)
            .bind(request_type)
            .fetch_one(pool)
            .await
    }

    /// Messages oldest first, with optional user and request-type filters.
    pub async fn list(
        pool: &PgPool,
        user_id: Option<DbId>,
        request_type: Option<&str>,
        page: Page,
    ) -> Result<Vec<ChatLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_logs
             WHERE ($1::BIGINT IS NULL OR user_id = $1)
               AND ($2::TEXT IS NULL OR request_type = $2)
             ORDER BY created_at, id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ChatLog>(&query)
            .bind(user_id)
            .bind(request_type)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }
}
