mod common;

use axum::http::StatusCode;
use common::{build_test_app, expect_json, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_ok_with_database(pool: PgPool) {
    let app = build_test_app(pool);

    let json = expect_json(get(&app, "/health").await, StatusCode::OK).await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_is_unavailable_when_database_is_gone(pool: PgPool) {
    let app = build_test_app(pool.clone());
    pool.close().await;

    let json = expect_json(get(&app, "/health").await, StatusCode::SERVICE_UNAVAILABLE).await;
    assert_eq!(json["status"], "unavailable");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_is_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(&app, "/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn responses_carry_request_id(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(&app, "/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_configured_origin(pool: PgPool) {
    let app = build_test_app(pool);
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/api/v1/project")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "PATCH")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = common::send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}
