//! Project entity model, team membership, and DTOs.

use serde::{Deserialize, Serialize};
use sitebook_core::payments::PaymentSummary;
use sitebook_core::types::{Day, DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

use crate::models::construction::Construction;
use crate::models::status::StatusId;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub customer_id: DbId,
    pub contractor_id: Option<DbId>,
    pub manager_id: DbId,
    /// 1 = active, 2 = completed.
    pub status_id: StatusId,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    pub contract_amount: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Project row joined with the names shown in listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub status: String,
    pub customer_name: String,
    pub contractor_name: Option<String>,
    pub manager_name: String,
    pub member_count: i64,
}

/// Everything the project page needs in one response.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectListItem,
    pub constructions: Vec<Construction>,
    pub team: Vec<ProjectMember>,
    pub document_count: i64,
    pub payments: PaymentSummary,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    pub description: Option<String>,
    pub customer_id: DbId,
    pub contractor_id: Option<DbId>,
    /// Defaults to the creating user when omitted.
    pub manager_id: Option<DbId>,
    /// Defaults to 1 (Active) if omitted.
    pub status_id: Option<StatusId>,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    pub contract_amount: Option<f64>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    pub description: Option<String>,
    pub customer_id: Option<DbId>,
    pub contractor_id: Option<DbId>,
    pub manager_id: Option<DbId>,
    pub status_id: Option<StatusId>,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    pub contract_amount: Option<f64>,
}

/// Listing filters. `visible_to` restricts rows to projects the given user
/// manages or is a member of.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub status_id: Option<StatusId>,
    pub customer_id: Option<DbId>,
    pub visible_to: Option<DbId>,
}

/// A team member as listed on a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub user_id: DbId,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub position: Option<String>,
    pub added_at: Timestamp,
}
