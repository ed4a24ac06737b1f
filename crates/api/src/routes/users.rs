//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                              -> list_users
/// POST   /                              -> create_user (admin)
/// GET    /{id}                          -> get_user
/// PATCH  /{id}                          -> update_user (admin)
/// DELETE /{id}                          -> delete_user (admin)
/// POST   /{id}/password                 -> reset_password (admin)
/// POST   /{id}/invalidate-sessions      -> invalidate_sessions (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/password", post(users::reset_password))
        .route("/{id}/invalidate-sessions", post(users::invalidate_sessions))
}
