//! Handlers for the `/company` resource (customers and contractors).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sitebook_core::types::DbId;
use sitebook_core::validation::validate_input;
use sitebook_db::models::company::{
    Company, CompanyFilter, CompanyWithProjects, CreateCompany, UpdateCompany,
};
use sitebook_db::models::status::CompanyType;
use sitebook_db::repositories::{CompanyRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/company?type=&search=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    AppQuery(filter): AppQuery<CompanyFilter>,
) -> AppResult<Json<DataResponse<Vec<Company>>>> {
    let type_id = filter
        .company_type
        .as_deref()
        .map(CompanyType::from_name)
        .transpose()?
        .map(CompanyType::id);
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let companies = CompanyRepo::list(&state.pool, type_id, search).await?;
    Ok(Json(DataResponse { data: companies }))
}

/// GET /api/v1/company/{id}
///
/// The company together with the projects it ordered.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<CompanyWithProjects>>> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Company", id))?;
    let projects = ProjectRepo::list_by_customer(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CompanyWithProjects { company, projects },
    }))
}

/// POST /api/v1/company
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    AppJson(input): AppJson<CreateCompany>,
) -> AppResult<(StatusCode, Json<DataResponse<Company>>)> {
    validate_input(&input)?;
    CompanyType::from_id(input.company_type_id)?;

    let company = CompanyRepo::create(&state.pool, &input).await?;
    tracing::info!(company_id = company.id, created_by = user.user_id, "Company created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}

/// PATCH /api/v1/company/{id}
///
/// A type change is refused with 409 while any project references the company.
pub async fn update(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateCompany>,
) -> AppResult<Json<DataResponse<Company>>> {
    validate_input(&input)?;
    if let Some(type_id) = input.company_type_id {
        CompanyType::from_id(type_id)?;
        let existing = CompanyRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::not_found("Company", id))?;
        if existing.company_type_id != type_id
            && CompanyRepo::is_referenced(&state.pool, id).await?
        {
            return Err(AppError::conflict(
                "Company type cannot change while projects reference the company",
            ));
        }
    }

    let company = CompanyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Company", id))?;
    Ok(Json(DataResponse { data: company }))
}

/// DELETE /api/v1/company/{id}
///
/// Refused with 409 while any project names the company as its customer.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if CompanyRepo::delete(&state.pool, id).await? {
        tracing::info!(company_id = id, deleted_by = user.user_id, "Company deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Company", id))
    }
}
