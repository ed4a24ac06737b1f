//! HTTP-level tests for `/company`.

mod common;

use axum::http::StatusCode;
use common::{
    build_test_app, create_company, create_project, delete_auth, expect_json, get_auth,
    patch_json_auth, post_json_auth, user_with_token,
};
use sitebook_core::roles::Role;
use sitebook_db::models::status::CompanyType;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn manager_creates_and_updates_company(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;

    let json = expect_json(
        post_json_auth(
            &app,
            "/api/v1/company",
            &token,
            serde_json::json!({
                "name": "Northwind Developments",
                "company_type_id": 1,
                "contact_person": "Dana",
                "email": "office@northwind.test",
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["company_type_id"], 1);

    let json = expect_json(
        patch_json_auth(
            &app,
            &format!("/api/v1/company/{id}"),
            &token,
            serde_json::json!({ "phone": "+1 555 0100" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["phone"], "+1 555 0100");
    assert_eq!(json["data"]["name"], "Northwind Developments");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_validates_type_and_email(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;

    let bad_type = post_json_auth(
        &app,
        "/api/v1/company",
        &token,
        serde_json::json!({ "name": "Acme", "company_type_id": 9 }),
    )
    .await;
    assert_eq!(bad_type.status(), StatusCode::BAD_REQUEST);

    let bad_email = post_json_auth(
        &app,
        "/api/v1/company",
        &token,
        serde_json::json!({ "name": "Acme", "company_type_id": 2, "email": "nope" }),
    )
    .await;
    let json = expect_json(bad_email, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_name_within_type_conflicts(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    create_company(&pool, "Acme", CompanyType::Contractor).await;

    let dup = post_json_auth(
        &app,
        "/api/v1/company",
        &token,
        serde_json::json!({ "name": "Acme", "company_type_id": 2 }),
    )
    .await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);

    // Same name as a customer is a different company.
    let other = post_json_auth(
        &app,
        "/api/v1/company",
        &token,
        serde_json::json!({ "name": "Acme", "company_type_id": 1 }),
    )
    .await;
    assert_eq!(other.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_type_and_search(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_emp, token) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    create_company(&pool, "Blue Harbor", CompanyType::Customer).await;
    create_company(&pool, "Harbor Steel", CompanyType::Contractor).await;
    create_company(&pool, "Granite Works", CompanyType::Contractor).await;

    let json = expect_json(
        get_auth(&app, "/api/v1/company?type=contractor", &token).await,
        StatusCode::OK,
    )
    .await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Granite Works", "Harbor Steel"]);

    let json = expect_json(
        get_auth(&app, "/api/v1/company?search=harbor", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let bad = get_auth(&app, "/api/v1/company?type=supplier", &token).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_lists_ordered_projects(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let project = create_project(&pool, "Riverside", mgr.id).await;

    let json = expect_json(
        get_auth(&app, &format!("/api/v1/company/{}", project.customer_id), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["name"], "Riverside Customer");
    assert_eq!(json["data"]["projects"][0]["name"], "Riverside");

    let missing = get_auth(&app, "/api/v1/company/424242", &token).await;
    let json = expect_json(missing, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn customer_with_projects_cannot_be_deleted(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let project = create_project(&pool, "Riverside", mgr.id).await;
    let spare = create_company(&pool, "Spare", CompanyType::Contractor).await;

    let blocked = delete_auth(
        &app,
        &format!("/api/v1/company/{}", project.customer_id),
        &token,
    )
    .await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    let ok = delete_auth(&app, &format!("/api/v1/company/{}", spare.id), &token).await;
    assert_eq!(ok.status(), StatusCode::NO_CONTENT);
    let gone = delete_auth(&app, &format!("/api/v1/company/{}", spare.id), &token).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn type_is_fixed_while_projects_reference_company(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let project = create_project(&pool, "Riverside", mgr.id).await;
    let builder = create_company(&pool, "Builder", CompanyType::Contractor).await;
    let idle = create_company(&pool, "Idle", CompanyType::Contractor).await;
    sqlx::query("UPDATE projects SET contractor_id = $2 WHERE id = $1")
        .bind(project.id)
        .bind(builder.id)
        .execute(&pool)
        .await
        .unwrap();

    let as_customer = patch_json_auth(
        &app,
        &format!("/api/v1/company/{}", project.customer_id),
        &token,
        serde_json::json!({ "company_type_id": CompanyType::Contractor.id() }),
    )
    .await;
    let json = expect_json(as_customer, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");

    let as_contractor = patch_json_auth(
        &app,
        &format!("/api/v1/company/{}", builder.id),
        &token,
        serde_json::json!({ "company_type_id": CompanyType::Customer.id() }),
    )
    .await;
    assert_eq!(as_contractor.status(), StatusCode::CONFLICT);

    // Restating the current type is not a change.
    let same = patch_json_auth(
        &app,
        &format!("/api/v1/company/{}", builder.id),
        &token,
        serde_json::json!({ "company_type_id": CompanyType::Contractor.id(), "name": "Builder Ltd" }),
    )
    .await;
    let json = expect_json(same, StatusCode::OK).await;
    assert_eq!(json["data"]["name"], "Builder Ltd");

    let free = patch_json_auth(
        &app,
        &format!("/api/v1/company/{}", idle.id),
        &token,
        serde_json::json!({ "company_type_id": CompanyType::Customer.id() }),
    )
    .await;
    let json = expect_json(free, StatusCode::OK).await;
    assert_eq!(json["data"]["company_type_id"], CompanyType::Customer.id());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_managers_cannot_write(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_emp, emp_token) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    let (_trial, trial_token) = user_with_token(&pool, &app, "trial", Role::Trial).await;

    for token in [&emp_token, &trial_token] {
        let response = post_json_auth(
            &app,
            "/api/v1/company",
            token,
            serde_json::json!({ "name": "Acme", "company_type_id": 1 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
