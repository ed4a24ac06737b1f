//! Role guards. Each wraps [`AuthUser`] and answers 403 when the caller's
//! role fails the matching [`Role`] predicate.
//!
//! ```ignore
//! async fn delete_company(RequireManager(user): RequireManager) -> AppResult<StatusCode> { ... }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sitebook_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

macro_rules! role_guard {
    ($(#[$doc:meta])* $name:ident, $allowed:expr, $denied:literal) => {
        $(#[$doc])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                let allowed: fn(Role) -> bool = $allowed;
                if !allowed(user.role) {
                    tracing::debug!(user_id = user.user_id, role = %user.role, guard = stringify!($name), "Role check failed");
                    return Err(AppError::forbidden($denied));
                }
                Ok($name(user))
            }
        }
    };
}

role_guard!(
    /// User management and chat-log administration.
    RequireAdmin,
    Role::is_admin,
    "Admin role required"
);

role_guard!(
    /// Writes on companies, projects, teams, schedules and plans.
    RequireManager,
    Role::is_manager_or_admin,
    "Manager or Admin role required"
);

role_guard!(
    /// Read-only management views (user lists, payments, analytics).
    RequireManagerOrTrial,
    Role::is_manager_or_trial,
    "Manager, Trial or Admin role required"
);

role_guard!(
    /// Anything that records work or uploads files.
    RequireNotTrial,
    Role::is_not_trial,
    "Trial accounts have read-only access"
);

role_guard!(
    /// Any signed-in user. Visibility checks happen in the handler.
    RequireAuth,
    |_| true,
    "Authentication required"
);
