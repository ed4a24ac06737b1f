//! Handlers for the `/analytics` resource.
//!
//! Each handler reads flat rows through [`AnalyticsRepo`] and hands them to
//! the pure aggregation functions in `sitebook_core`. All endpoints require
//! management read access.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sitebook_core::analytics::{
    compare_project_workload, project_hours, project_workload, BookedHours, PlannedAssignment,
    ProjectHours, ProjectWorkload, ProjectWorkloadComparison,
};
use sitebook_core::payments::{summarize_payments, PaymentSummary};
use sitebook_core::roles::Role;
use sitebook_core::types::{Day, DbId};
use sitebook_core::workload::{
    summarize_employee_hours, validate_report_range, EmployeeHours, ReportedDay,
};
use sitebook_db::models::analytics::NamedCount;
use sitebook_db::models::status::ProjectStatus;
use sitebook_db::repositories::{AnalyticsRepo, PaymentScheduleRepo, ProjectRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppQuery;
use crate::middleware::rbac::RequireManagerOrTrial;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EmployeeHoursParams {
    pub start_date: Day,
    pub end_date: Day,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectsWorkloadParams {
    /// Defaults to today.
    pub date: Option<Day>,
    pub compare_date: Option<Day>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectHoursParams {
    pub start_date: Day,
    pub end_date: Day,
    pub project_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeHoursReport {
    pub start_date: Day,
    pub end_date: Day,
    pub hours_per_day: f64,
    pub employees: Vec<EmployeeHours>,
}

/// Per-project figures for one date, or side by side with a compare date.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProjectsWorkloadRows {
    Single(Vec<ProjectWorkload>),
    Compared(Vec<ProjectWorkloadComparison>),
}

#[derive(Debug, Serialize)]
pub struct ProjectsWorkloadReport {
    pub date: Day,
    pub compare_date: Option<Day>,
    pub projects: ProjectsWorkloadRows,
}

#[derive(Debug, Serialize)]
pub struct ProjectHoursReport {
    pub start_date: Day,
    pub end_date: Day,
    pub total_hours: f64,
    pub projects: Vec<ProjectHours>,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub projects_by_status: Vec<NamedCount>,
    pub companies_by_type: Vec<NamedCount>,
    pub users_by_role: Vec<NamedCount>,
    pub document_count: i64,
    pub payments: PaymentSummary,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/analytics/employee-work-hours?start_date=&end_date=&user_id=
///
/// Reported against the expected hours for Monday-Friday working days.
pub async fn employee_work_hours(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppQuery(params): AppQuery<EmployeeHoursParams>,
) -> AppResult<Json<DataResponse<EmployeeHoursReport>>> {
    validate_report_range(params.start_date, params.end_date)?;

    let employees: Vec<(DbId, String)> = match params.user_id {
        Some(user_id) => {
            let user = UserRepo::find_by_id(&state.pool, user_id)
                .await?
                .ok_or(AppError::not_found("User", user_id))?;
            vec![(user.id, user.full_name)]
        }
        None => {
            let role_ids: Vec<i16> = Role::ALL
                .into_iter()
                .filter(|r| r.tracks_workload())
                .map(Role::id)
                .collect();
            UserRepo::list_active_by_roles(&state.pool, &role_ids)
                .await?
                .into_iter()
                .map(|u| (u.id, u.full_name))
                .collect()
        }
    };

    let days: Vec<ReportedDay> = AnalyticsRepo::reported_days(
        &state.pool,
        params.start_date,
        params.end_date,
        params.user_id,
    )
    .await?
    .into_iter()
    .map(ReportedDay::from)
    .collect();

    let hours_per_day = state.config.work_hours_per_day;
    let lines = summarize_employee_hours(
        &employees,
        &days,
        params.start_date,
        params.end_date,
        hours_per_day,
    );

    Ok(Json(DataResponse {
        data: EmployeeHoursReport {
            start_date: params.start_date,
            end_date: params.end_date,
            hours_per_day,
            employees: lines,
        },
    }))
}

/// Planned and booked figures per active project on one day.
async fn workload_on(state: &AppState, date: Day) -> AppResult<Vec<ProjectWorkload>> {
    let active = ProjectStatus::Active.id();
    let projects = ProjectRepo::list_names_by_status(&state.pool, active).await?;
    let plans: Vec<PlannedAssignment> = AnalyticsRepo::planned_on(&state.pool, date, active)
        .await?
        .into_iter()
        .map(PlannedAssignment::from)
        .collect();
    let booked: Vec<BookedHours> = AnalyticsRepo::booked_on(&state.pool, date, active)
        .await?
        .into_iter()
        .map(BookedHours::from)
        .collect();
    Ok(project_workload(&projects, &plans, &booked))
}

/// GET /api/v1/analytics/projects-workload?date=&compare_date=
pub async fn projects_workload(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppQuery(params): AppQuery<ProjectsWorkloadParams>,
) -> AppResult<Json<DataResponse<ProjectsWorkloadReport>>> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let current = workload_on(&state, date).await?;

    let projects = match params.compare_date {
        Some(compare_date) => {
            let earlier = workload_on(&state, compare_date).await?;
            ProjectsWorkloadRows::Compared(compare_project_workload(&current, &earlier))
        }
        None => ProjectsWorkloadRows::Single(current),
    };

    Ok(Json(DataResponse {
        data: ProjectsWorkloadReport {
            date,
            compare_date: params.compare_date,
            projects,
        },
    }))
}

/// GET /api/v1/analytics/project-hours?start_date=&end_date=&project_id=
pub async fn project_hours_report(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppQuery(params): AppQuery<ProjectHoursParams>,
) -> AppResult<Json<DataResponse<ProjectHoursReport>>> {
    validate_report_range(params.start_date, params.end_date)?;

    let booked: Vec<BookedHours> = AnalyticsRepo::booked_between(
        &state.pool,
        params.start_date,
        params.end_date,
        params.project_id,
    )
    .await?
    .into_iter()
    .map(BookedHours::from)
    .collect();

    let projects = project_hours(&booked);
    let total_hours: f64 = projects.iter().map(|p| p.total_hours).sum();

    Ok(Json(DataResponse {
        data: ProjectHoursReport {
            start_date: params.start_date,
            end_date: params.end_date,
            total_hours,
            projects,
        },
    }))
}

/// GET /api/v1/analytics/overview
pub async fn overview(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
) -> AppResult<Json<DataResponse<Overview>>> {
    let projects_by_status = AnalyticsRepo::projects_by_status(&state.pool).await?;
    let companies_by_type = AnalyticsRepo::companies_by_type(&state.pool).await?;
    let users_by_role = AnalyticsRepo::users_by_role(&state.pool).await?;
    let document_count = AnalyticsRepo::document_count(&state.pool).await?;
    let lines = PaymentScheduleRepo::lines(&state.pool, None).await?;

    Ok(Json(DataResponse {
        data: Overview {
            projects_by_status,
            companies_by_type,
            users_by_role,
            document_count,
            payments: summarize_payments(&lines, Utc::now().date_naive()),
        },
    }))
}
