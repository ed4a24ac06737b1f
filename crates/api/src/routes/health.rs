//! `GET /health`, mounted outside `/api/v1` and without authentication.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn from_db_check(db_healthy: bool) -> (StatusCode, Self) {
        let (code, status) = match db_healthy {
            true => (StatusCode::OK, "ok"),
            false => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        };
        let body = Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        };
        (code, body)
    }
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_check = sitebook_db::health_check(&state.pool).await;
    if let Err(e) = &db_check {
        tracing::warn!(error = %e, "Database ping failed");
    }
    let (code, body) = HealthResponse::from_db_check(db_check.is_ok());
    (code, Json(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
