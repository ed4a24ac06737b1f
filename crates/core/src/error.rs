use crate::types::DbId;

/// Domain failure, independent of transport. The API layer picks the
/// status code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not authenticated: {0}")]
    Unauthorized(String),

    #[error("not allowed: {0}")]
    Forbidden(String),

    #[error("internal: {0}")]
    Internal(String),
}
