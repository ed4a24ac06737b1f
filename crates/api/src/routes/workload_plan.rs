//! Route definitions for the `/workload-plan` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::workload_plan;
use crate::state::AppState;

/// Routes mounted at `/workload-plan`.
///
/// ```text
/// GET    /        -> list (?start_date=, ?end_date=, ?user_id=, ?project_id=)
/// POST   /        -> create
/// GET    /my      -> list_my
/// POST   /bulk    -> create_bulk
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workload_plan::list).post(workload_plan::create))
        .route("/my", get(workload_plan::list_my))
        .route("/bulk", post(workload_plan::create_bulk))
        .route(
            "/{id}",
            patch(workload_plan::update).delete(workload_plan::delete),
        )
}
