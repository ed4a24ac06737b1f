//! Construction (project sub-unit) model and DTOs.

use serde::{Deserialize, Serialize};
use sitebook_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `constructions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Construction {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateConstruction {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 1000))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateConstruction {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 1000))]
    pub address: Option<String>,
}
