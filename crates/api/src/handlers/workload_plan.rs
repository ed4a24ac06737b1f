//! Handlers for the `/workload-plan` resource (who is planned onto which
//! project on which day).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use sitebook_core::types::DbId;
use sitebook_core::validation::validate_input;
use sitebook_core::workload::validate_plan_date;
use sitebook_db::models::workload::{
    BulkCreateWorkloadPlan, CreateWorkloadPlan, UpdateWorkloadPlan, WorkloadPlan,
    WorkloadPlanEntry, WorkloadPlanFilter,
};
use sitebook_db::repositories::{UserRepo, WorkloadPlanRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::access::ensure_project_exists;
use crate::middleware::rbac::{RequireAuth, RequireManager, RequireManagerOrTrial};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Only active, non-trial users can be planned.
async fn ensure_plannable_user(pool: &sqlx::PgPool, user_id: DbId) -> AppResult<()> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(AppError::not_found("User", user_id))?;
    let not_trial = user.role().is_some_and(|r| r.is_not_trial());
    if !user.is_active || !not_trial {
        return Err(AppError::validation(format!(
            "User {user_id} cannot be planned: must be active and not a trial account"
        )));
    }
    Ok(())
}

/// GET /api/v1/workload-plan?start_date=&end_date=&user_id=&project_id=
pub async fn list(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppQuery(filter): AppQuery<WorkloadPlanFilter>,
) -> AppResult<Json<DataResponse<Vec<WorkloadPlanEntry>>>> {
    let entries = WorkloadPlanRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/workload-plan/my?start_date=&end_date=
pub async fn list_my(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppQuery(range): AppQuery<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<WorkloadPlanEntry>>>> {
    let filter = WorkloadPlanFilter {
        start_date: range.start_date,
        end_date: range.end_date,
        user_id: Some(user.user_id),
        project_id: None,
    };
    let entries = WorkloadPlanRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/workload-plan
///
/// 409 when the user is already planned onto the project that day.
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    AppJson(input): AppJson<CreateWorkloadPlan>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkloadPlan>>)> {
    validate_plan_date(input.work_date, Utc::now().date_naive())?;
    ensure_project_exists(&state.pool, input.project_id).await?;
    ensure_plannable_user(&state.pool, input.user_id).await?;

    let plan = WorkloadPlanRepo::create(&state.pool, &input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: plan })))
}

/// POST /api/v1/workload-plan/bulk
///
/// Plans every listed user in one transaction. Users already planned onto
/// the project that day are skipped; only new rows are returned.
pub async fn create_bulk(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    AppJson(input): AppJson<BulkCreateWorkloadPlan>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<WorkloadPlan>>>)> {
    validate_input(&input)?;
    validate_plan_date(input.work_date, Utc::now().date_naive())?;
    ensure_project_exists(&state.pool, input.project_id).await?;

    let mut user_ids = input.user_ids.clone();
    user_ids.sort_unstable();
    user_ids.dedup();
    for &user_id in &user_ids {
        ensure_plannable_user(&state.pool, user_id).await?;
    }

    let created = WorkloadPlanRepo::create_bulk(
        &state.pool,
        &user_ids,
        input.project_id,
        input.work_date,
        user.user_id,
    )
    .await?;

    tracing::info!(
        project_id = input.project_id,
        work_date = %input.work_date,
        requested = user_ids.len(),
        created = created.len(),
        "Bulk workload plan created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PATCH /api/v1/workload-plan/{id}
///
/// The planned user must still be plannable; a plan of a deactivated
/// account can only be deleted.
pub async fn update(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateWorkloadPlan>,
) -> AppResult<Json<DataResponse<WorkloadPlan>>> {
    let existing = WorkloadPlanRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("WorkloadPlan", id))?;
    ensure_plannable_user(&state.pool, existing.user_id).await?;

    if let Some(work_date) = input.work_date {
        validate_plan_date(work_date, Utc::now().date_naive())?;
    }
    if let Some(project_id) = input.project_id {
        ensure_project_exists(&state.pool, project_id).await?;
    }

    let plan = WorkloadPlanRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("WorkloadPlan", id))?;
    Ok(Json(DataResponse { data: plan }))
}

/// DELETE /api/v1/workload-plan/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if WorkloadPlanRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("WorkloadPlan", id))
    }
}
