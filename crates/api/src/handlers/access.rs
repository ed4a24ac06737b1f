//! Project visibility checks shared by every handler that reads project data.
//!
//! Admins and managers see every project. Employees and trial accounts see
//! only projects they manage or belong to; anything else answers 404 so the
//! project's existence is not disclosed.

use sitebook_core::types::DbId;
use sitebook_db::models::project::Project;
use sitebook_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// The user id to restrict project queries to, or `None` when unrestricted.
pub fn visibility_scope(user: &AuthUser) -> Option<DbId> {
    if user.role.sees_all_projects() {
        None
    } else {
        Some(user.user_id)
    }
}

/// Load a project the caller is allowed to see.
pub async fn ensure_project_visible(
    pool: &sqlx::PgPool,
    user: &AuthUser,
    project_id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::not_found("Project", project_id))?;

    if let Some(user_id) = visibility_scope(user) {
        if !ProjectRepo::is_visible_to(pool, project_id, user_id).await? {
            return Err(AppError::not_found("Project", project_id));
        }
    }
    Ok(project)
}

/// Load a project by id for a write; visibility does not apply because only
/// managers and admins write.
pub async fn ensure_project_exists(pool: &sqlx::PgPool, project_id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::not_found("Project", project_id))
}
