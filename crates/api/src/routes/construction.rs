//! Route definitions for the `/construction` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::construction;
use crate::state::AppState;

/// Routes mounted at `/construction`.
///
/// ```text
/// GET    /        -> list (?project_id=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(construction::list).post(construction::create))
        .route(
            "/{id}",
            get(construction::get_by_id)
                .patch(construction::update)
                .delete(construction::delete),
        )
}
