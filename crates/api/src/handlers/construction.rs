//! Handlers for the `/construction` resource (buildings and sites within a
//! project).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sitebook_core::types::DbId;
use sitebook_core::validation::validate_input;
use sitebook_db::models::construction::{Construction, CreateConstruction, UpdateConstruction};
use sitebook_db::repositories::{ConstructionRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::access::{ensure_project_exists, ensure_project_visible, visibility_scope};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// `?project_id=` is required for the listing.
#[derive(Debug, Deserialize)]
pub struct ConstructionListParams {
    pub project_id: DbId,
}

/// GET /api/v1/construction?project_id=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppQuery(params): AppQuery<ConstructionListParams>,
) -> AppResult<Json<DataResponse<Vec<Construction>>>> {
    ensure_project_visible(&state.pool, &user, params.project_id).await?;
    let items = ConstructionRepo::list_by_project(&state.pool, params.project_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/construction/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Construction>>> {
    let construction = ConstructionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Construction", id))?;
    if let Some(user_id) = visibility_scope(&user) {
        if !ProjectRepo::is_visible_to(&state.pool, construction.project_id, user_id).await? {
            return Err(AppError::not_found("Construction", id));
        }
    }
    Ok(Json(DataResponse { data: construction }))
}

/// POST /api/v1/construction
pub async fn create(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppJson(input): AppJson<CreateConstruction>,
) -> AppResult<(StatusCode, Json<DataResponse<Construction>>)> {
    validate_input(&input)?;
    ensure_project_exists(&state.pool, input.project_id).await?;

    let construction = ConstructionRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: construction })))
}

/// PATCH /api/v1/construction/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateConstruction>,
) -> AppResult<Json<DataResponse<Construction>>> {
    validate_input(&input)?;
    let construction = ConstructionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Construction", id))?;
    Ok(Json(DataResponse { data: construction }))
}

/// DELETE /api/v1/construction/{id}
///
/// Documents attached to the construction stay on the project.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if ConstructionRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Construction", id))
    }
}
