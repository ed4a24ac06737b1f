//! Handlers for the `/project` resource and its team sub-resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use sitebook_core::payments::summarize_payments;
use sitebook_core::projects::{validate_contract_amount, validate_date_range};
use sitebook_core::types::DbId;
use sitebook_core::validation::validate_input;
use sitebook_db::models::project::{
    CreateProject, Project, ProjectDetail, ProjectFilter, ProjectListItem, ProjectMember,
    UpdateProject,
};
use sitebook_db::models::status::{CompanyType, ProjectStatus};
use sitebook_db::repositories::{
    CompanyRepo, ConstructionRepo, DocumentRepo, PaymentScheduleRepo, ProjectMemberRepo,
    ProjectRepo, UserRepo,
};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::access::{ensure_project_exists, ensure_project_visible, visibility_scope};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /project`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    /// `active` or `completed`.
    pub status: Option<String>,
    pub customer_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

async fn ensure_company_type(
    pool: &sqlx::PgPool,
    company_id: DbId,
    expected: CompanyType,
    field: &str,
) -> AppResult<()> {
    let company = CompanyRepo::find_by_id(pool, company_id)
        .await?
        .ok_or(AppError::not_found("Company", company_id))?;
    if company.company_type_id != expected.id() {
        return Err(AppError::validation(format!(
            "{field} must reference a {} company",
            expected.name()
        )));
    }
    Ok(())
}

async fn ensure_manager_user(pool: &sqlx::PgPool, user_id: DbId) -> AppResult<()> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(AppError::not_found("User", user_id))?;
    let is_manager = user.role().is_some_and(|r| r.is_manager_or_admin());
    if !is_manager || !user.is_active {
        return Err(AppError::validation(
            "manager_id must reference an active manager or admin",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// GET /api/v1/project?status=&customer_id=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppQuery(params): AppQuery<ProjectListParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectListItem>>>> {
    let status_id = params
        .status
        .as_deref()
        .map(ProjectStatus::from_name)
        .transpose()?
        .map(ProjectStatus::id);

    let filter = ProjectFilter {
        status_id,
        customer_id: params.customer_id,
        visible_to: visibility_scope(&user),
    };
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/project/{id}
///
/// Project with names, constructions, team, document count and the payment
/// summary as of today.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = ProjectRepo::find_list_item(&state.pool, id, visibility_scope(&user))
        .await?
        .ok_or(AppError::not_found("Project", id))?;

    let constructions = ConstructionRepo::list_by_project(&state.pool, id).await?;
    let team = ProjectMemberRepo::list(&state.pool, id).await?;
    let document_count = DocumentRepo::count_for_project(&state.pool, id).await?;
    let lines = PaymentScheduleRepo::lines(&state.pool, Some(id)).await?;
    let payments = summarize_payments(&lines, Utc::now().date_naive());

    Ok(Json(DataResponse {
        data: ProjectDetail {
            project,
            constructions,
            team,
            document_count,
            payments,
        },
    }))
}

/// POST /api/v1/project
///
/// The manager defaults to the caller; status defaults to Active.
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    AppJson(input): AppJson<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate_input(&input)?;
    validate_date_range(input.start_date, input.end_date)?;
    validate_contract_amount(input.contract_amount)?;
    if let Some(status_id) = input.status_id {
        ProjectStatus::from_id(status_id)?;
    }

    ensure_company_type(&state.pool, input.customer_id, CompanyType::Customer, "customer_id")
        .await?;
    if let Some(contractor_id) = input.contractor_id {
        ensure_company_type(&state.pool, contractor_id, CompanyType::Contractor, "contractor_id")
            .await?;
    }
    let manager_id = input.manager_id.unwrap_or(user.user_id);
    ensure_manager_user(&state.pool, manager_id).await?;

    let project = ProjectRepo::create(&state.pool, &input, manager_id).await?;
    tracing::info!(project_id = project.id, created_by = user.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PATCH /api/v1/project/{id}
///
/// Provided references get the same checks as on create; the date range is
/// checked against the merged values.
pub async fn update(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    validate_input(&input)?;
    let existing = ensure_project_exists(&state.pool, id).await?;

    validate_date_range(
        input.start_date.or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;
    validate_contract_amount(input.contract_amount)?;
    if let Some(status_id) = input.status_id {
        ProjectStatus::from_id(status_id)?;
    }
    if let Some(customer_id) = input.customer_id {
        ensure_company_type(&state.pool, customer_id, CompanyType::Customer, "customer_id")
            .await?;
    }
    if let Some(contractor_id) = input.contractor_id {
        ensure_company_type(&state.pool, contractor_id, CompanyType::Contractor, "contractor_id")
            .await?;
    }
    if let Some(manager_id) = input.manager_id {
        ensure_manager_user(&state.pool, manager_id).await?;
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/project/{id}
///
/// Child rows go with the project through cascades; document files are
/// removed from disk afterwards.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let stored_names = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;

    for stored_name in &stored_names {
        state.documents.remove_logged(stored_name).await;
    }

    tracing::info!(
        project_id = id,
        files_removed = stored_names.len(),
        deleted_by = user.user_id,
        "Project deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// GET /api/v1/project/{id}/users
pub async fn list_members(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectMember>>>> {
    ensure_project_visible(&state.pool, &user, id).await?;
    let members = ProjectMemberRepo::list(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/project/{id}/users/{user_id}
///
/// 409 when the user is already on the team.
pub async fn add_member(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath((id, user_id)): AppPath<(DbId, DbId)>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<ProjectMember>>>)> {
    ensure_project_exists(&state.pool, id).await?;
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::not_found("User", user_id))?;

    ProjectMemberRepo::add(&state.pool, id, user_id).await?;
    tracing::info!(project_id = id, user_id, "Team member added");

    let members = ProjectMemberRepo::list(&state.pool, id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: members })))
}

/// DELETE /api/v1/project/{id}/users/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath((id, user_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_project_exists(&state.pool, id).await?;
    if !ProjectMemberRepo::remove(&state.pool, id, user_id).await? {
        return Err(AppError::not_found("ProjectMember", user_id));
    }
    tracing::info!(project_id = id, user_id, "Team member removed");
    Ok(StatusCode::NO_CONTENT)
}
