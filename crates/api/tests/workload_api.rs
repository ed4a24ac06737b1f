//! HTTP-level tests for `/workload-plan` and `/workload-actual`.

mod common;

use axum::http::StatusCode;
use chrono::{Days, Utc};
use common::{
    build_test_app, create_project, delete_auth, expect_json, get_auth, patch_json_auth,
    post_json_auth, user_with_token,
};
use sitebook_core::roles::Role;
use sitebook_core::types::Day;
use sqlx::PgPool;

fn today() -> Day {
    Utc::now().date_naive()
}

fn days_from_today(offset: i64) -> String {
    let today = today();
    let day = if offset >= 0 {
        today.checked_add_days(Days::new(offset as u64))
    } else {
        today.checked_sub_days(Days::new(offset.unsigned_abs()))
    };
    day.expect("date in range").to_string()
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn plan_dates_and_duplicates(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (emp, _) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    let project = create_project(&pool, "Depot", mgr.id).await;

    let past = post_json_auth(
        &app,
        "/api/v1/workload-plan",
        &token,
        serde_json::json!({
            "user_id": emp.id,
            "project_id": project.id,
            "work_date": days_from_today(-1),
        }),
    )
    .await;
    assert_eq!(past.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({
        "user_id": emp.id,
        "project_id": project.id,
        "work_date": days_from_today(0),
    });
    let json = expect_json(
        post_json_auth(&app, "/api/v1/workload-plan", &token, body.clone()).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(json["data"]["created_by"], mgr.id);

    let dup = post_json_auth(&app, "/api/v1/workload-plan", &token, body).await;
    let json = expect_json(dup, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trial_and_inactive_users_cannot_be_planned(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (trial, _) = user_with_token(&pool, &app, "trial", Role::Trial).await;
    let project = create_project(&pool, "Depot", mgr.id).await;

    let response = post_json_auth(
        &app,
        "/api/v1/workload-plan",
        &token,
        serde_json::json!({
            "user_id": trial.id,
            "project_id": project.id,
            "work_date": days_from_today(1),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        &app,
        "/api/v1/workload-plan",
        &token,
        serde_json::json!({
            "user_id": 999999,
            "project_id": project.id,
            "work_date": days_from_today(1),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plans_of_deactivated_users_cannot_be_moved(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (emp, _) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    let project = create_project(&pool, "Depot", mgr.id).await;

    let json = expect_json(
        post_json_auth(
            &app,
            "/api/v1/workload-plan",
            &token,
            serde_json::json!({
                "user_id": emp.id,
                "project_id": project.id,
                "work_date": days_from_today(1),
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let url = format!("/api/v1/workload-plan/{}", json["data"]["id"]);

    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(emp.id)
        .execute(&pool)
        .await
        .unwrap();

    let moved = patch_json_auth(
        &app,
        &url,
        &token,
        serde_json::json!({ "work_date": days_from_today(2) }),
    )
    .await;
    let json = expect_json(moved, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let deleted = delete_auth(&app, &url, &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let missing = patch_json_auth(&app, &url, &token, serde_json::json!({})).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_plan_skips_existing_assignments(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (a, _) = user_with_token(&pool, &app, "alice", Role::Employee).await;
    let (b, _) = user_with_token(&pool, &app, "bob", Role::Employee).await;
    let project = create_project(&pool, "Depot", mgr.id).await;
    let day = days_from_today(2);

    post_json_auth(
        &app,
        "/api/v1/workload-plan",
        &token,
        serde_json::json!({ "user_id": a.id, "project_id": project.id, "work_date": day }),
    )
    .await;

    let json = expect_json(
        post_json_auth(
            &app,
            "/api/v1/workload-plan/bulk",
            &token,
            serde_json::json!({
                "user_ids": [a.id, b.id, b.id],
                "project_id": project.id,
                "work_date": day,
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let created = json["data"].as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["user_id"], b.id);

    let json = expect_json(
        get_auth(
            &app,
            &format!("/api/v1/workload-plan?project_id={}", project.id),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"][0]["project_name"], "Depot");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn my_plan_and_access(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (emp, emp_token) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    let project = create_project(&pool, "Depot", mgr.id).await;

    let json = expect_json(
        post_json_auth(
            &app,
            "/api/v1/workload-plan",
            &token,
            serde_json::json!({
                "user_id": emp.id,
                "project_id": project.id,
                "work_date": days_from_today(3),
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let plan_id = json["data"]["id"].as_i64().unwrap();

    let json = expect_json(
        get_auth(&app, "/api/v1/workload-plan/my", &emp_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"][0]["id"], plan_id);
    assert_eq!(json["data"][0]["user_name"], "emp Tester");

    // Team-wide listing is management only.
    let response = get_auth(&app, "/api/v1/workload-plan", &emp_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = expect_json(
        patch_json_auth(
            &app,
            &format!("/api/v1/workload-plan/{plan_id}"),
            &token,
            serde_json::json!({ "work_date": days_from_today(4) }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["work_date"], days_from_today(4));

    let response = delete_auth(&app, &format!("/api/v1/workload-plan/{plan_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Actuals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_hours_with_distribution(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, _) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (_emp, token) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    let depot = create_project(&pool, "Depot", mgr.id).await;
    let harbor = create_project(&pool, "Harbor", mgr.id).await;

    let json = expect_json(
        post_json_auth(
            &app,
            "/api/v1/workload-actual",
            &token,
            serde_json::json!({
                "work_date": days_from_today(0),
                "hours_worked": 8.0,
                "description": "Formwork",
                "distributions": [
                    { "project_id": depot.id, "hours": 5.0 },
                    { "project_id": harbor.id, "hours": 3.0 },
                ],
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(json["data"]["hours_worked"], 8.0);
    assert_eq!(json["data"]["distributions"].as_array().unwrap().len(), 2);

    let json = expect_json(
        get_auth(&app, "/api/v1/workload-actual/my", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_validation(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, _) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (_emp, token) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    let depot = create_project(&pool, "Depot", mgr.id).await;

    let cases = [
        serde_json::json!({ "work_date": days_from_today(1), "hours_worked": 8.0 }),
        serde_json::json!({ "work_date": days_from_today(0), "hours_worked": 0.0 }),
        serde_json::json!({ "work_date": days_from_today(0), "hours_worked": 25.0 }),
        serde_json::json!({
            "work_date": days_from_today(0),
            "hours_worked": 4.0,
            "distributions": [{ "project_id": depot.id, "hours": 5.0 }],
        }),
        serde_json::json!({
            "work_date": days_from_today(0),
            "hours_worked": 8.0,
            "distributions": [
                { "project_id": depot.id, "hours": 2.0 },
                { "project_id": depot.id, "hours": 2.0 },
            ],
        }),
    ];
    for body in cases {
        let response = post_json_auth(&app, "/api/v1/workload-actual", &token, body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    let unknown_project = post_json_auth(
        &app,
        "/api/v1/workload-actual",
        &token,
        serde_json::json!({
            "work_date": days_from_today(0),
            "hours_worked": 8.0,
            "distributions": [{ "project_id": 999999, "hours": 1.0 }],
        }),
    )
    .await;
    assert_eq!(unknown_project.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn one_report_per_day(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_emp, token) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    let body = serde_json::json!({ "date": days_from_today(-1), "hours_worked": 6.5 });

    let first = post_json_auth(&app, "/api/v1/workload-actual", &token, body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = post_json_auth(&app, "/api/v1/workload-actual", &token, body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reporting_for_others_needs_manager(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_mgr, mgr_token) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (alice, alice_token) = user_with_token(&pool, &app, "alice", Role::Employee).await;
    let (bob, _) = user_with_token(&pool, &app, "bob", Role::Employee).await;
    let (_trial, trial_token) = user_with_token(&pool, &app, "trial", Role::Trial).await;

    let body = serde_json::json!({
        "user_id": bob.id,
        "work_date": days_from_today(0),
        "hours_worked": 8.0,
    });
    let response = post_json_auth(&app, "/api/v1/workload-actual", &alice_token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = expect_json(
        post_json_auth(&app, "/api/v1/workload-actual", &mgr_token, body).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(json["data"]["user_id"], bob.id);
    let bob_entry = json["data"]["id"].as_i64().unwrap();

    // Alice cannot read or change Bob's entry.
    let uri = format!("/api/v1/workload-actual/{bob_entry}");
    assert_eq!(get_auth(&app, &uri, &alice_token).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        patch_json_auth(&app, &uri, &alice_token, serde_json::json!({ "hours_worked": 1.0 }))
            .await
            .status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(delete_auth(&app, &uri, &alice_token).await.status(), StatusCode::FORBIDDEN);

    // Trial accounts read but never write.
    assert_eq!(get_auth(&app, &uri, &trial_token).await.status(), StatusCode::OK);
    let response = post_json_auth(
        &app,
        "/api/v1/workload-actual",
        &trial_token,
        serde_json::json!({ "work_date": days_from_today(0), "hours_worked": 8.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = expect_json(
        get_auth(
            &app,
            &format!("/api/v1/workload-actual?user_id={}", alice.id),
            &mgr_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_rechecks_existing_split(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (mgr, _) = user_with_token(&pool, &app, "mgr", Role::Manager).await;
    let (_emp, token) = user_with_token(&pool, &app, "emp", Role::Employee).await;
    let depot = create_project(&pool, "Depot", mgr.id).await;

    let json = expect_json(
        post_json_auth(
            &app,
            "/api/v1/workload-actual",
            &token,
            serde_json::json!({
                "work_date": days_from_today(0),
                "hours_worked": 8.0,
                "distributions": [{ "project_id": depot.id, "hours": 6.0 }],
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let uri = format!("/api/v1/workload-actual/{}", json["data"]["id"]);

    // Fewer hours than already distributed.
    let response =
        patch_json_auth(&app, &uri, &token, serde_json::json!({ "hours_worked": 5.0 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = expect_json(
        patch_json_auth(
            &app,
            &uri,
            &token,
            serde_json::json!({
                "hours_worked": 5.0,
                "distributions": [{ "project_id": depot.id, "hours": 4.0 }],
            }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["hours_worked"], 5.0);
    assert_eq!(json["data"]["distributions"][0]["hours"], 4.0);

    assert_eq!(delete_auth(&app, &uri, &token).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get_auth(&app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}
