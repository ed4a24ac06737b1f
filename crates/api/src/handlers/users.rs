//! Handlers for the `/users` resource (user management).
//!
//! Reads are open to managers and trial accounts; every write requires the
//! `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sitebook_core::roles::Role;
use sitebook_core::types::DbId;
use sitebook_core::validation::validate_input;
use sitebook_db::models::user::{CreateUser, UpdateUser, UserFilter, UserResponse};
use sitebook_db::repositories::{SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::{RequireAdmin, RequireManagerOrTrial};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    pub full_name: String,
    pub password: String,
    pub role: String,
    #[validate(length(max = 255))]
    pub position: Option<String>,
}

/// Request body for `PATCH /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    pub full_name: Option<String>,
    #[validate(length(max = 255))]
    pub position: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /users/{id}/password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// Response for `POST /users/{id}/invalidate-sessions`.
#[derive(Debug, Serialize)]
pub struct InvalidatedSessions {
    pub user_id: DbId,
    pub token_version: i32,
    pub revoked_sessions: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users?role=&include_inactive=
pub async fn list_users(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppQuery(filter): AppQuery<UserFilter>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let role_id = filter
        .role
        .as_deref()
        .map(Role::from_name)
        .transpose()?
        .map(Role::id);

    let users = UserRepo::list(&state.pool, role_id, filter.include_inactive).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireManagerOrTrial(_user): RequireManagerOrTrial,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/v1/users
///
/// Create a user with an explicit role. Returns 201 with the safe
/// [`UserResponse`].
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_input(&input)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;
    let role = Role::from_name(&input.role)?;

    let email = input.email.trim().to_lowercase();
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::conflict("A user with this email already exists"));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            full_name: input.full_name.trim().to_string(),
            password_hash,
            role_id: role.id(),
            position: input.position,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %role, created_by = admin.user_id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// PATCH /api/v1/users/{id}
///
/// A role change or deactivation invalidates the user's outstanding tokens.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate_input(&input)?;
    let role_id = input
        .role
        .as_deref()
        .map(Role::from_name)
        .transpose()?
        .map(Role::id);

    let demotes_self = role_id.is_some_and(|r| r != admin.role.id());
    if id == admin.user_id && (input.is_active == Some(false) || demotes_self) {
        return Err(AppError::BadRequest(
            "Admins cannot deactivate or demote themselves".into(),
        ));
    }

    let update = UpdateUser {
        email: input.email.map(|e| e.trim().to_lowercase()),
        full_name: input.full_name.map(|n| n.trim().to_string()),
        position: input.position,
        role_id,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    if input.is_active == Some(false) {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }

    tracing::info!(user_id = id, updated_by = admin.user_id, "User updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/v1/users/{id}/password
///
/// Set a new password. Existing tokens and refresh sessions stop working.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, id, &password_hash).await? {
        return Err(AppError::not_found("User", id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, reset_by = admin.user_id, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/{id}/invalidate-sessions
///
/// Bump the token version and revoke every refresh session.
pub async fn invalidate_sessions(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<InvalidatedSessions>>> {
    let token_version = UserRepo::bump_token_version(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    let revoked_sessions = SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(
        user_id = id,
        token_version,
        revoked_sessions,
        invalidated_by = admin.user_id,
        "Sessions invalidated",
    );
    Ok(Json(DataResponse {
        data: InvalidatedSessions {
            user_id: id,
            token_version,
            revoked_sessions,
        },
    }))
}

/// DELETE /api/v1/users/{id}
///
/// Hard delete. Rejected with 409 while the user still manages projects.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::BadRequest("Admins cannot delete themselves".into()));
    }

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("User", id));
    }

    tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
