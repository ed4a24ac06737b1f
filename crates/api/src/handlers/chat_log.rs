//! Handlers for the `/chat-log` resource (assistant conversation history).
//!
//! The log is append-only: there are no update or delete endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sitebook_core::chat::{validate_chat_role, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use sitebook_core::pagination::Page;
use sitebook_core::validation::validate_input;
use sitebook_db::models::chat_log::{ChatLog, ChatLogFilter, CreateChatLog};
use sitebook_db::repositories::ChatLogRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/chat-log
///
/// Appends a message authored by the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppJson(input): AppJson<CreateChatLog>,
) -> AppResult<(StatusCode, Json<DataResponse<ChatLog>>)> {
    validate_input(&input)?;
    validate_chat_role(&input.role)?;

    let entry = ChatLogRepo::create(
        &state.pool,
        user.user_id,
        &input.role,
        &input.content,
        input.request_type.trim(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/chat-log/my?limit=&offset=
///
/// The caller's history, oldest first.
pub async fn list_my(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ChatLog>>>> {
    let page = Page::clamped(
        params.limit,
        params.offset,
        DEFAULT_HISTORY_LIMIT,
        MAX_HISTORY_LIMIT,
    );
    let entries = ChatLogRepo::list(&state.pool, Some(user.user_id), None, page).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/chat-log?user_id=&request_type=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(filter): AppQuery<ChatLogFilter>,
) -> AppResult<Json<DataResponse<Vec<ChatLog>>>> {
    let page = Page::clamped(
        filter.limit,
        filter.offset,
        DEFAULT_HISTORY_LIMIT,
        MAX_HISTORY_LIMIT,
    );

    let entries = ChatLogRepo::list(
        &state.pool,
        filter.user_id,
        filter.request_type.as_deref(),
        page,
    )
    .await?;
    Ok(Json(DataResponse { data: entries }))
}
