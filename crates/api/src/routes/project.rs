//! Route definitions for the `/project` resource and its team.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/project`.
///
/// ```text
/// GET    /                          -> list (?status=, ?customer_id=)
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PATCH  /{id}                      -> update
/// DELETE /{id}                      -> delete
///
/// GET    /{id}/users                -> list_members
/// POST   /{id}/users/{user_id}      -> add_member
/// DELETE /{id}/users/{user_id}      -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/users", get(project::list_members))
        .route(
            "/{id}/users/{user_id}",
            post(project::add_member).delete(project::remove_member),
        )
}
