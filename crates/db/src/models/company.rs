//! Company entity model and DTOs.

use serde::{Deserialize, Serialize};
use sitebook_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

use crate::models::project::Project;
use crate::models::status::StatusId;

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    /// 1 = customer, 2 = contractor.
    pub company_type_id: StatusId,
    pub tax_id: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A company together with the projects it ordered.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyWithProjects {
    #[serde(flatten)]
    pub company: Company,
    pub projects: Vec<Project>,
}

/// DTO for creating a new company.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompany {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub company_type_id: StatusId,
    #[validate(length(max = 32))]
    pub tax_id: Option<String>,
    #[validate(length(max = 255))]
    pub contact_person: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 1000))]
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an existing company. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCompany {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub company_type_id: Option<StatusId>,
    #[validate(length(max = 32))]
    pub tax_id: Option<String>,
    #[validate(length(max = 255))]
    pub contact_person: Option<String>,
    #[validate(length(max = 64))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 1000))]
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Query filters for the company listing (`?type=&search=`).
#[derive(Debug, Default, Deserialize)]
pub struct CompanyFilter {
    #[serde(rename = "type")]
    pub company_type: Option<String>,
    pub search: Option<String>,
}
