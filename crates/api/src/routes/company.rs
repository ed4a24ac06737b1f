//! Route definitions for the `/company` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::company;
use crate::state::AppState;

/// Routes mounted at `/company`.
///
/// ```text
/// GET    /        -> list (?type=, ?search=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(company::list).post(company::create))
        .route(
            "/{id}",
            get(company::get_by_id)
                .patch(company::update)
                .delete(company::delete),
        )
}
