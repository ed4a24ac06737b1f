//! Route definitions for the `/analytics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET /employee-work-hours   -> employee_work_hours
/// GET /projects-workload     -> projects_workload
/// GET /project-hours         -> project_hours_report
/// GET /overview              -> overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/employee-work-hours", get(analytics::employee_work_hours))
        .route("/projects-workload", get(analytics::projects_workload))
        .route("/project-hours", get(analytics::project_hours_report))
        .route("/overview", get(analytics::overview))
}
