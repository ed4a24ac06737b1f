//! HTTP-level tests for `/users` management.

mod common;

use axum::http::StatusCode;
use common::{
    build_test_app, create_project, delete_auth, expect_json, get_auth, patch_json_auth,
    post_auth, post_json, post_json_auth, user_with_token,
};
use sitebook_core::roles::Role;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_user_who_can_log_in(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_admin, token) = user_with_token(&pool, &app, "root", Role::Admin).await;

    let response = post_json_auth(
        &app,
        "/api/v1/users",
        &token,
        serde_json::json!({
            "email": "Worker@Example.com",
            "full_name": "Site Worker",
            "password": "strong-password",
            "role": "employee",
            "position": "Foreman",
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["email"], "worker@example.com");
    assert_eq!(json["data"]["role"], "employee");
    assert!(json["data"].get("password_hash").is_none());

    let login = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "worker@example.com", "password": "strong-password" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_unknown_role_and_short_password(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_admin, token) = user_with_token(&pool, &app, "root", Role::Admin).await;

    let bad_role = post_json_auth(
        &app,
        "/api/v1/users",
        &token,
        serde_json::json!({
            "email": "x@example.com",
            "full_name": "X",
            "password": "strong-password",
            "role": "owner",
        }),
    )
    .await;
    assert_eq!(bad_role.status(), StatusCode::BAD_REQUEST);

    let short = post_json_auth(
        &app,
        "/api/v1/users",
        &token,
        serde_json::json!({
            "email": "y@example.com",
            "full_name": "Y",
            "password": "1234567",
            "role": "employee",
        }),
    )
    .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_admin_writes_users(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_manager, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;

    let response = post_json_auth(
        &app,
        "/api/v1/users",
        &token,
        serde_json::json!({
            "email": "z@example.com",
            "full_name": "Z",
            "password": "strong-password",
            "role": "employee",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Managers can still read.
    let list = get_auth(&app, "/api/v1/users", &token).await;
    assert_eq!(list.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn employees_cannot_list_users(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_emp, token) = user_with_token(&pool, &app, "emp", Role::Employee).await;

    let response = get_auth(&app, "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_role_and_hides_inactive(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_admin, token) = user_with_token(&pool, &app, "root", Role::Admin).await;
    let (gone, _) = user_with_token(&pool, &app, "gone", Role::Employee).await;
    user_with_token(&pool, &app, "here", Role::Employee).await;

    let response = patch_json_auth(
        &app,
        &format!("/api/v1/users/{}", gone.id),
        &token,
        serde_json::json!({ "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = expect_json(
        get_auth(&app, "/api/v1/users?role=employee", &token).await,
        StatusCode::OK,
    )
    .await;
    let emails: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["here@example.com"]);

    let json = expect_json(
        get_auth(&app, "/api/v1/users?role=employee&include_inactive=true", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn password_reset_kills_existing_tokens(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_admin, admin_token) = user_with_token(&pool, &app, "root", Role::Admin).await;
    let (user, user_token) = user_with_token(&pool, &app, "emp", Role::Employee).await;

    let response = post_json_auth(
        &app,
        &format!("/api/v1/users/{}/password", user.id),
        &admin_token,
        serde_json::json!({ "new_password": "brand-new-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let me = get_auth(&app, "/api/v1/auth/me", &user_token).await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);

    let relogin = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": user.email, "password": "brand-new-password" }),
    )
    .await;
    assert_eq!(relogin.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalidate_sessions_bumps_version(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_admin, admin_token) = user_with_token(&pool, &app, "root", Role::Admin).await;
    let (user, user_token) = user_with_token(&pool, &app, "emp", Role::Employee).await;

    let json = expect_json(
        post_auth(
            &app,
            &format!("/api/v1/users/{}/invalidate-sessions", user.id),
            &admin_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["token_version"], user.token_version + 1);
    assert_eq!(json["data"]["revoked_sessions"], 1);

    let me = get_auth(&app, "/api/v1/auth/me", &user_token).await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);

    // Unknown user.
    let missing = post_auth(&app, "/api/v1/users/999999/invalidate-sessions", &admin_token).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_rules(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (admin, token) = user_with_token(&pool, &app, "root", Role::Admin).await;
    let (manager, _) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (employee, _) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    create_project(&pool, "Tower", manager.id).await;

    let self_delete = delete_auth(&app, &format!("/api/v1/users/{}", admin.id), &token).await;
    assert_eq!(self_delete.status(), StatusCode::BAD_REQUEST);

    let manages_projects =
        delete_auth(&app, &format!("/api/v1/users/{}", manager.id), &token).await;
    assert_eq!(manages_projects.status(), StatusCode::CONFLICT);

    let ok = delete_auth(&app, &format!("/api/v1/users/{}", employee.id), &token).await;
    assert_eq!(ok.status(), StatusCode::NO_CONTENT);

    let again = delete_auth(&app, &format!("/api/v1/users/{}", employee.id), &token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_cannot_deactivate_self(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (admin, token) = user_with_token(&pool, &app, "root", Role::Admin).await;

    let response = patch_json_auth(
        &app,
        &format!("/api/v1/users/{}", admin.id),
        &token,
        serde_json::json!({ "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Renaming yourself is fine and does not invalidate the token.
    let response = patch_json_auth(
        &app,
        &format!("/api/v1/users/{}", admin.id),
        &token,
        serde_json::json!({ "full_name": "Root Admin" }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["full_name"], "Root Admin");
    assert_eq!(
        get_auth(&app, "/api/v1/auth/me", &token).await.status(),
        StatusCode::OK
    );
}
