//! Shared harness for the HTTP integration tests.
//!
//! Every test gets its own database (via `#[sqlx::test]`) and its own
//! temporary upload directory, and drives the real router through
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use sitebook_api::auth::jwt::JwtConfig;
use sitebook_api::auth::password::hash_password;
use sitebook_api::config::{ServerConfig, UploadConfig};
use sitebook_api::router::build_app_router;
use sitebook_api::state::AppState;
use sitebook_api::storage::DocumentStore;
use sitebook_core::roles::Role;
use sitebook_core::types::DbId;
use sitebook_db::models::company::{Company, CreateCompany};
use sitebook_db::models::project::{CreateProject, Project};
use sitebook_db::models::status::CompanyType;
use sitebook_db::models::user::{CreateUser, User};
use sitebook_db::repositories::{CompanyRepo, ProjectMemberRepo, ProjectRepo, UserRepo};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Upload limit used by the test config, small enough to exceed in a test.
pub const TEST_MAX_UPLOAD_BYTES: u64 = 64 * 1024;

/// Build a test `ServerConfig` with safe defaults and the given upload dir.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-that-is-long-enough".to_string(),
            access_ttl: chrono::Duration::minutes(15),
            refresh_ttl: chrono::Duration::days(7),
        },
        upload: UploadConfig {
            dir: upload_dir.to_path_buf(),
            max_bytes: TEST_MAX_UPLOAD_BYTES,
        },
        work_hours_per_day: 8.0,
        initial_admin: None,
    }
}

/// The router plus the upload directory backing it. The directory is
/// removed when the value is dropped.
pub struct TestApp {
    pub router: Router,
    pub store: DocumentStore,
    _upload_dir: TempDir,
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(upload_dir.path());
    let store = DocumentStore::new(config.upload.dir.clone());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        documents: store.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        _upload_dir: upload_dir,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, request("GET", uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, request("GET", uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, None, body).await
}

pub async fn post_json_auth(
    app: &TestApp,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, "POST", uri, Some(token), body).await
}

pub async fn patch_json_auth(
    app: &TestApp,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, "PATCH", uri, Some(token), body).await
}

pub async fn post_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, request("POST", uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn delete_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, request("DELETE", uri, Some(token)).body(Body::empty()).unwrap()).await
}

async fn send_json(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let req = request(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, String),
    File(&'a str, &'a str, Vec<u8>),
}

const BOUNDARY: &str = "sitebook-test-boundary-7MA4YWxkTrZu0gW";

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut out = Vec::new();
    for part in parts {
        out.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                out.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                out.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                out.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(bytes);
            }
        }
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    out
}

pub async fn post_multipart_auth(
    app: &TestApp,
    uri: &str,
    token: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let req = request("POST", uri, Some(token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, req).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Assert the status and return the JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, name: &str, role: Role) -> User {
    let input = CreateUser {
        email: format!("{name}@example.com"),
        full_name: format!("{name} Tester"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role_id: role.id(),
        position: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the access token.
pub async fn login(app: &TestApp, email: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": TEST_PASSWORD }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    json["access_token"].as_str().expect("access_token").to_string()
}

/// Create a user with `role` and log them in.
pub async fn user_with_token(
    pool: &PgPool,
    app: &TestApp,
    name: &str,
    role: Role,
) -> (User, String) {
    let user = create_user(pool, name, role).await;
    let token = login(app, &user.email).await;
    (user, token)
}

pub async fn create_company(pool: &PgPool, name: &str, kind: CompanyType) -> Company {
    CompanyRepo::create(
        pool,
        &CreateCompany {
            name: name.to_string(),
            company_type_id: kind.id(),
            tax_id: None,
            contact_person: None,
            phone: None,
            email: None,
            address: None,
            notes: None,
        },
    )
    .await
    .expect("company creation should succeed")
}

/// A project for a fresh customer, managed by `manager_id`.
pub async fn create_project(pool: &PgPool, name: &str, manager_id: DbId) -> Project {
    let customer = create_company(pool, &format!("{name} Customer"), CompanyType::Customer).await;
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            code: None,
            description: None,
            customer_id: customer.id,
            contractor_id: None,
            manager_id: None,
            status_id: None,
            start_date: None,
            end_date: None,
            contract_amount: None,
        },
        manager_id,
    )
    .await
    .expect("project creation should succeed")
}

pub async fn add_member(pool: &PgPool, project_id: DbId, user_id: DbId) {
    ProjectMemberRepo::add(pool, project_id, user_id)
        .await
        .expect("adding member should succeed");
}
