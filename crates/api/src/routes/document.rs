//! Route definitions for the `/document` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::document;
use crate::state::AppState;

/// Routes mounted at `/document`.
///
/// ```text
/// POST   /upload          -> upload (multipart)
/// GET    /                -> list (?project_id=, ?construction_id=)
/// GET    /{id}            -> get_by_id
/// PATCH  /{id}            -> update
/// DELETE /{id}            -> delete
/// GET    /{id}/download   -> download
/// POST   /{id}/replace    -> replace (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(document::upload))
        .route("/", get(document::list))
        .route(
            "/{id}",
            get(document::get_by_id)
                .patch(document::update)
                .delete(document::delete),
        )
        .route("/{id}/download", get(document::download))
        .route("/{id}/replace", post(document::replace))
}
