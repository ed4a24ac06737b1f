//! Route definitions for the `/payment-schedule` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::payment_schedule;
use crate::state::AppState;

/// Routes mounted at `/payment-schedule`.
///
/// ```text
/// GET    /            -> list (?project_id=)
/// POST   /            -> create
/// GET    /summary     -> summary (?project_id=)
/// GET    /{id}        -> get_by_id
/// PATCH  /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(payment_schedule::list).post(payment_schedule::create),
        )
        .route("/summary", get(payment_schedule::summary))
        .route(
            "/{id}",
            get(payment_schedule::get_by_id)
                .patch(payment_schedule::update)
                .delete(payment_schedule::delete),
        )
}
