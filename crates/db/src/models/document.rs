//! Document model. Files live on disk under a random `stored_name`; the
//! row tracks the original name and a version counter bumped on replace.

use serde::{Deserialize, Serialize};
use sitebook_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub project_id: DbId,
    pub construction_id: Option<DbId>,
    pub name: String,
    pub original_name: String,
    #[serde(skip_serializing)]
    pub stored_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub version: i32,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a freshly uploaded document.
#[derive(Debug)]
pub struct CreateDocument {
    pub project_id: DbId,
    pub construction_id: Option<DbId>,
    pub name: String,
    pub original_name: String,
    pub stored_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<DbId>,
}

/// New file details written when a document is replaced.
#[derive(Debug)]
pub struct ReplaceDocumentFile {
    pub original_name: String,
    pub stored_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<DbId>,
}

/// Metadata changes (`PATCH /document/{id}`).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDocument {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub construction_id: Option<DbId>,
}

/// Query filters for the document listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentFilter {
    pub project_id: DbId,
    pub construction_id: Option<DbId>,
}
