//! Route definitions for the `/chat-log` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::chat_log;
use crate::state::AppState;

/// Routes mounted at `/chat-log`.
///
/// ```text
/// GET  /      -> list (admin)
/// POST /      -> create
/// GET  /my    -> list_my
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(chat_log::list).post(chat_log::create))
        .route("/my", get(chat_log::list_my))
}
