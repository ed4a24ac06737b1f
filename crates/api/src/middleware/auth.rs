//! The [`AuthUser`] extractor: bearer token in, current user row out.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sitebook_core::roles::Role;
use sitebook_core::types::DbId;
use sitebook_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// The caller of an authenticated endpoint.
///
/// The token only names the user. A missing or inactive row, or a `tv` claim
/// behind `users.token_version`, is a 401. Role changes apply on the next
/// request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    /// Whether this user may act on data owned by `owner_id`: the owner
    /// themselves, or a manager/admin.
    pub fn can_manage_owned_by(&self, owner_id: DbId) -> bool {
        self.user_id == owner_id || self.role.is_manager_or_admin()
    }
}

/// The token from `Authorization: Bearer <token>`. The scheme is matched
/// case-insensitively.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Malformed Authorization header"))?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AppError::unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>",
        )),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = state
            .config
            .jwt
            .decode_access_token(bearer_token(parts)?)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                AppError::unauthorized("Invalid or expired token")
            })?;

        // Role, activity and token version all come from the current row.
        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::unauthorized("User is missing or deactivated"))?;

        if user.token_version != claims.tv {
            return Err(AppError::unauthorized("Session has been invalidated"));
        }

        let role = user
            .role()
            .ok_or_else(|| AppError::InternalError(format!("Unknown role id {}", user.role_id)))?;

        Ok(AuthUser {
            user_id: user.id,
            role,
        })
    }
}
