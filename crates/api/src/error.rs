//! HTTP error type. Every failure leaves the API as
//! `{ "error": <message>, "code": <CODE> }` with a matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sitebook_core::error::CoreError;
use sitebook_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input that never reached domain validation (multipart
    /// framing, non-numeric form ids, self-targeting admin actions).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Core(CoreError::Forbidden(msg.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Core(CoreError::Validation(msg.into()))
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Core(CoreError::Conflict(msg.into()))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Core(CoreError::Unauthorized(msg.into()))
    }
}

/// Machine-readable `code` field of the error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    Conflict,
    Unauthorized,
    Forbidden,
    BadRequest,
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ValidationError | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: ErrorCode,
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl AppError {
    /// Code and client-facing message. Internal details are logged here and
    /// replaced by a generic message.
    fn classify(&self) -> (ErrorCode, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    (ErrorCode::NotFound, format!("{entity} with id {id} not found"))
                }
                CoreError::Validation(msg) => (ErrorCode::ValidationError, msg.clone()),
                CoreError::Conflict(msg) => (ErrorCode::Conflict, msg.clone()),
                CoreError::Unauthorized(msg) => (ErrorCode::Unauthorized, msg.clone()),
                CoreError::Forbidden(msg) => (ErrorCode::Forbidden, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (ErrorCode::InternalError, INTERNAL_MESSAGE.to_string())
                }
            },
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (ErrorCode::BadRequest, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (ErrorCode::InternalError, INTERNAL_MESSAGE.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, error) = self.classify();
        (code.status(), Json(ErrorBody { error, code })).into_response()
    }
}

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Client message for a violated constraint, by constraint name.
fn constraint_message(constraint: &str) -> String {
    let known = match constraint {
        "uq_users_email" => "A user with this email already exists",
        "uq_companies_name_type" => "A company with this name and type already exists",
        "uq_projects_code" => "A project with this code already exists",
        "uq_project_members_project_user" => "The user is already on the project team",
        "uq_workload_plans_user_project_date" => {
            "The user is already planned onto this project for that day"
        }
        "uq_workload_actuals_user_date" => "Hours were already reported for that day",
        "uq_workload_distributions_actual_project" => {
            "A project appears more than once in the distribution"
        }
        "fk_projects_customer" => "The company is still the customer of a project",
        "fk_projects_manager" => "The user still manages projects",
        _ => return format!("Operation conflicts with existing data ({constraint})"),
    };
    known.to_string()
}

/// `RowNotFound` is a 404; unique violations on `uq_*` constraints and any
/// foreign-key violation are 409; the rest is a 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (ErrorCode, String) {
    match err {
        sqlx::Error::RowNotFound => (ErrorCode::NotFound, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                    (ErrorCode::Conflict, constraint_message(constraint))
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    (ErrorCode::Conflict, constraint_message(constraint))
                }
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    (ErrorCode::InternalError, INTERNAL_MESSAGE.to_string())
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (ErrorCode::InternalError, INTERNAL_MESSAGE.to_string())
        }
    }
}
