//! HTTP-level tests for `/construction`.

mod common;

use axum::http::StatusCode;
use common::{
    add_member, build_test_app, create_project, delete_auth, expect_json, get_auth,
    patch_json_auth, post_json_auth, user_with_token, TestApp,
};
use sitebook_core::roles::Role;
use sitebook_core::types::DbId;
use sqlx::PgPool;

async fn create_construction(
    app: &TestApp,
    token: &str,
    project_id: DbId,
    name: &str,
) -> serde_json::Value {
    expect_json(
        post_json_auth(
            app,
            "/api/v1/construction",
            token,
            serde_json::json!({ "project_id": project_id, "name": name }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await["data"]
        .clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manager_lists_updates_and_deletes(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let project = create_project(&pool, "Harbour", mgr.id).await;

    let tower = create_construction(&app, &token, project.id, "Tower B").await;
    create_construction(&app, &token, project.id, "Annex").await;
    assert_eq!(tower["project_id"], project.id);
    assert!(tower["address"].is_null());

    let json = expect_json(
        get_auth(&app, &format!("/api/v1/construction?project_id={}", project.id), &token).await,
        StatusCode::OK,
    )
    .await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Annex", "Tower B"]);

    let url = format!("/api/v1/construction/{}", tower["id"]);
    let json = expect_json(
        patch_json_auth(
            &app,
            &url,
            &token,
            serde_json::json!({ "address": "12 Quay Street" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["name"], "Tower B");
    assert_eq!(json["data"]["address"], "12 Quay Street");

    let json = expect_json(get_auth(&app, &url, &token).await, StatusCode::OK).await;
    assert_eq!(json["data"]["address"], "12 Quay Street");

    let blank = patch_json_auth(&app, &url, &token, serde_json::json!({ "name": "" })).await;
    let json = expect_json(blank, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let deleted = delete_auth(&app, &url, &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let again = delete_auth(&app, &url, &token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    let gone = get_auth(&app, &url, &token).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_existing_project(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;

    let response = post_json_auth(
        &app,
        "/api/v1/construction",
        &token,
        serde_json::json!({ "project_id": 424242, "name": "Nowhere" }),
    )
    .await;
    let json = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");

    let missing = patch_json_auth(
        &app,
        "/api/v1/construction/424242",
        &token,
        serde_json::json!({ "name": "Nowhere" }),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn employees_see_only_their_projects(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, mgr_token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (member, member_token) = user_with_token(&pool, &app, "member", Role::Employee).await;
    let (_outsider, outsider_token) =
        user_with_token(&pool, &app, "outsider", Role::Employee).await;
    let project = create_project(&pool, "Harbour", mgr.id).await;
    add_member(&pool, project.id, member.id).await;
    let hall = create_construction(&app, &mgr_token, project.id, "Hall").await;

    let list_url = format!("/api/v1/construction?project_id={}", project.id);
    let item_url = format!("/api/v1/construction/{}", hall["id"]);

    let json = expect_json(get_auth(&app, &list_url, &member_token).await, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    let json = expect_json(get_auth(&app, &item_url, &member_token).await, StatusCode::OK).await;
    assert_eq!(json["data"]["name"], "Hall");

    let hidden_list = get_auth(&app, &list_url, &outsider_token).await;
    assert_eq!(hidden_list.status(), StatusCode::NOT_FOUND);
    let hidden_item = get_auth(&app, &item_url, &outsider_token).await;
    assert_eq!(hidden_item.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_managers_cannot_write(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, mgr_token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (emp, emp_token) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    let (_trial, trial_token) = user_with_token(&pool, &app, "trial", Role::Trial).await;
    let project = create_project(&pool, "Harbour", mgr.id).await;
    add_member(&pool, project.id, emp.id).await;
    let hall = create_construction(&app, &mgr_token, project.id, "Hall").await;
    let item_url = format!("/api/v1/construction/{}", hall["id"]);

    for token in [&emp_token, &trial_token] {
        let created = post_json_auth(
            &app,
            "/api/v1/construction",
            token,
            serde_json::json!({ "project_id": project.id, "name": "Shed" }),
        )
        .await;
        assert_eq!(created.status(), StatusCode::FORBIDDEN);

        let updated =
            patch_json_auth(&app, &item_url, token, serde_json::json!({ "name": "Shed" })).await;
        assert_eq!(updated.status(), StatusCode::FORBIDDEN);

        let deleted = delete_auth(&app, &item_url, token).await;
        assert_eq!(deleted.status(), StatusCode::FORBIDDEN);
    }

    let json = expect_json(get_auth(&app, &item_url, &mgr_token).await, StatusCode::OK).await;
    assert_eq!(json["data"]["name"], "Hall");
}
