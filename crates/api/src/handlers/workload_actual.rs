//! Handlers for the `/workload-actual` resource (hours users report per day,
//! optionally split across projects).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use sitebook_core::types::{Day, DbId};
use sitebook_core::validation::validate_input;
use sitebook_core::workload::{
    validate_actual_date, validate_distributions, validate_hours_worked, HoursSplit,
};
use sitebook_db::models::workload::{
    CreateWorkloadActual, DistributionInput, UpdateWorkloadActual, WorkloadActualFilter,
    WorkloadActualWithDistributions,
};
use sitebook_db::repositories::{UserRepo, WorkloadActualRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::access::ensure_project_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireManagerOrTrial, RequireNotTrial};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /workload-actual`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkloadActualRequest {
    /// Managers and admins may report for someone else.
    pub user_id: Option<DbId>,
    #[serde(alias = "date")]
    pub work_date: Day,
    pub hours_worked: f64,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub distributions: Vec<DistributionInput>,
}

fn splits(distributions: &[DistributionInput]) -> Vec<HoursSplit> {
    distributions.iter().map(HoursSplit::from).collect()
}

async fn ensure_distribution_projects(
    pool: &sqlx::PgPool,
    distributions: &[DistributionInput],
) -> AppResult<()> {
    for d in distributions {
        ensure_project_exists(pool, d.project_id).await?;
    }
    Ok(())
}

/// Load an entry the caller owns, or any entry for managers and admins.
async fn ensure_actual_writable(
    pool: &sqlx::PgPool,
    user: &AuthUser,
    id: DbId,
) -> AppResult<WorkloadActualWithDistributions> {
    let entry = WorkloadActualRepo::find_with_distributions(pool, id)
        .await?
        .ok_or(AppError::not_found("WorkloadActual", id))?;
    if !user.can_manage_owned_by(entry.actual.user_id) {
        return Err(AppError::forbidden(
            "Only the owner or a manager can change this entry",
        ));
    }
    Ok(entry)
}

/// POST /api/v1/workload-actual
///
/// 409 when the user already reported hours for that day.
pub async fn create(
    State(state): State<AppState>,
    RequireNotTrial(user): RequireNotTrial,
    AppJson(input): AppJson<CreateWorkloadActualRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkloadActualWithDistributions>>)> {
    validate_input(&input)?;

    let user_id = match input.user_id {
        Some(other) if other != user.user_id => {
            if !user.role.is_manager_or_admin() {
                return Err(AppError::forbidden(
                    "Only managers can report hours for another user",
                ));
            }
            UserRepo::find_by_id(&state.pool, other)
                .await?
                .ok_or(AppError::not_found("User", other))?;
            other
        }
        _ => user.user_id,
    };

    validate_actual_date(input.work_date, Utc::now().date_naive())?;
    validate_hours_worked(input.hours_worked)?;
    validate_distributions(input.hours_worked, &splits(&input.distributions))?;
    ensure_distribution_projects(&state.pool, &input.distributions).await?;

    let entry = WorkloadActualRepo::create(
        &state.pool,
        &CreateWorkloadActual {
            user_id,
            work_date: input.work_date,
            hours_worked: input.hours_worked,
            description: input.description,
            distributions: input.distributions,
        },
    )
    .await?;

    tracing::info!(
        workload_actual_id = entry.actual.id,
        user_id,
        work_date = %entry.actual.work_date,
        reported_by = user.user_id,
        "Worked hours reported",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/workload-actual?start_date=&end_date=&user_id=
pub async fn list(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppQuery(filter): AppQuery<WorkloadActualFilter>,
) -> AppResult<Json<DataResponse<Vec<WorkloadActualWithDistributions>>>> {
    let entries = WorkloadActualRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/workload-actual/my?start_date=&end_date=
pub async fn list_my(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppQuery(range): AppQuery<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<WorkloadActualWithDistributions>>>> {
    let filter = WorkloadActualFilter {
        start_date: range.start_date,
        end_date: range.end_date,
        user_id: Some(user.user_id),
    };
    let entries = WorkloadActualRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/workload-actual/{id}
///
/// The owner, or anyone with management read access.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<WorkloadActualWithDistributions>>> {
    let entry = WorkloadActualRepo::find_with_distributions(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("WorkloadActual", id))?;
    if entry.actual.user_id != user.user_id && !user.role.is_manager_or_trial() {
        return Err(AppError::forbidden("You can only view your own entries"));
    }
    Ok(Json(DataResponse { data: entry }))
}

/// PATCH /api/v1/workload-actual/{id}
///
/// New distributions replace the old ones. The split is rechecked against
/// the resulting hours either way.
pub async fn update(
    State(state): State<AppState>,
    RequireNotTrial(user): RequireNotTrial,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateWorkloadActual>,
) -> AppResult<Json<DataResponse<WorkloadActualWithDistributions>>> {
    validate_input(&input)?;
    let existing = ensure_actual_writable(&state.pool, &user, id).await?;

    let hours_worked = input.hours_worked.unwrap_or(existing.actual.hours_worked);
    validate_hours_worked(hours_worked)?;

    match &input.distributions {
        Some(distributions) => {
            validate_distributions(hours_worked, &splits(distributions))?;
            ensure_distribution_projects(&state.pool, distributions).await?;
        }
        None => {
            let current: Vec<HoursSplit> = existing
                .distributions
                .iter()
                .map(|d| HoursSplit {
                    project_id: d.project_id,
                    hours: d.hours,
                })
                .collect();
            validate_distributions(hours_worked, &current)?;
        }
    }

    let entry = WorkloadActualRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("WorkloadActual", id))?;
    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/workload-actual/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireNotTrial(user): RequireNotTrial,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    ensure_actual_writable(&state.pool, &user, id).await?;
    if WorkloadActualRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("WorkloadActual", id))
    }
}
