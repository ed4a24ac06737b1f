//! Route definitions for the `/workload-actual` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::workload_actual;
use crate::state::AppState;

/// Routes mounted at `/workload-actual`.
///
/// ```text
/// GET    /        -> list (?start_date=, ?end_date=, ?user_id=)
/// POST   /        -> create
/// GET    /my      -> list_my
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workload_actual::list).post(workload_actual::create),
        )
        .route("/my", get(workload_actual::list_my))
        .route(
            "/{id}",
            get(workload_actual::get_by_id)
                .patch(workload_actual::update)
                .delete(workload_actual::delete),
        )
}
