//! Workload plan (manager assignments) and actual hours (employee reports).

use serde::{Deserialize, Serialize};
use sitebook_core::types::{Day, DbId, Timestamp};
use sitebook_core::workload::HoursSplit;
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// A row from the `workload_plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkloadPlan {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub work_date: Day,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Plan row joined with user and project names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkloadPlanEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub project_id: DbId,
    pub project_name: String,
    pub work_date: Day,
    pub created_by: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkloadPlan {
    pub user_id: DbId,
    pub project_id: DbId,
    pub work_date: Day,
}

/// Assign several users to one project on one day.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkCreateWorkloadPlan {
    #[validate(length(min = 1, max = 200, message = "Provide between 1 and 200 users"))]
    pub user_ids: Vec<DbId>,
    pub project_id: DbId,
    pub work_date: Day,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWorkloadPlan {
    pub project_id: Option<DbId>,
    pub work_date: Option<Day>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkloadPlanFilter {
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Actuals
// ---------------------------------------------------------------------------

/// A row from the `workload_actuals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkloadActual {
    pub id: DbId,
    pub user_id: DbId,
    pub work_date: Day,
    pub hours_worked: f64,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A per-project slice of an actual entry, with the project name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkloadDistribution {
    pub id: DbId,
    pub workload_actual_id: DbId,
    pub project_id: DbId,
    pub project_name: String,
    pub hours: f64,
}

/// An actual entry with its distributions.
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadActualWithDistributions {
    #[serde(flatten)]
    pub actual: WorkloadActual,
    pub distributions: Vec<WorkloadDistribution>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct DistributionInput {
    pub project_id: DbId,
    pub hours: f64,
}

impl From<&DistributionInput> for HoursSplit {
    fn from(d: &DistributionInput) -> Self {
        HoursSplit {
            project_id: d.project_id,
            hours: d.hours,
        }
    }
}

/// Validated values for a new actual entry.
#[derive(Debug, Clone)]
pub struct CreateWorkloadActual {
    pub user_id: DbId,
    pub work_date: Day,
    pub hours_worked: f64,
    pub description: Option<String>,
    pub distributions: Vec<DistributionInput>,
}

/// Changes to an actual entry. `distributions: Some(..)` replaces all slices.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWorkloadActual {
    pub hours_worked: Option<f64>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub distributions: Option<Vec<DistributionInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkloadActualFilter {
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    pub user_id: Option<DbId>,
}
