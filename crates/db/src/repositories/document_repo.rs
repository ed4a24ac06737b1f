//! Repository for the `documents` table.
//!
//! File bytes live in the API's document store; these methods only touch
//! rows. Methods that drop a file reference return the stored name so the
//! caller can remove it from disk after the row change succeeds.

use sitebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document, ReplaceDocumentFile, UpdateDocument};

/// Selected by every query that returns a full row.
const COLUMNS: &str = "id, project_id, construction_id, name, original_name, stored_name, \
                        mime_type, size_bytes, version, uploaded_by, created_at, updated_at";

/// Provides CRUD operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a new document at version 1, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents
                (project_id, construction_id, name, original_name, stored_name,
                 mime_type, size_bytes, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(input.project_id)
            .bind(input.construction_id)
            .bind(&input.name)
            .bind(&input.original_name)
            .bind(&input.stored_name)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a document by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Documents of a project, newest first, optionally for one construction.
    pub async fn list(
        pool: &PgPool,
        project_id: DbId,
        construction_id: Option<DbId>,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE project_id = $1
               AND ($2::BIGINT IS NULL OR construction_id = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(project_id)
            .bind(construction_id)
            .fetch_all(pool)
            .await
    }

    /// Point a document at a newly stored file and bump its version by one.
    ///
    /// The current row is locked while it is read so concurrent replaces
    /// serialize. Returns the updated row and the previous stored name, or
    /// `None` if the document does not exist.
    pub async fn replace_file(
        pool: &PgPool,
        id: DbId,
        input: &ReplaceDocumentFile,
    ) -> Result<Option<(Document, String)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<(String,)> =
            sqlx::query_as("SELECT stored_name FROM documents WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((previous_stored_name,)) = previous else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE documents SET
                original_name = $2,
                stored_name = $3,
                mime_type = $4,
                size_bytes = $5,
                uploaded_by = $6,
                version = version + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(&input.original_name)
            .bind(&input.stored_name)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(input.uploaded_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((document, previous_stored_name)))
    }

    /// Rename a document or move it to another construction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET
                name = COALESCE($2, name),
                construction_id = COALESCE($3, construction_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.construction_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a document row, returning it so the file can be removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("DELETE FROM documents WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_for_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
