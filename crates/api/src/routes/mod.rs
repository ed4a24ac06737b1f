pub mod analytics;
pub mod auth;
pub mod chat_log;
pub mod company;
pub mod construction;
pub mod document;
pub mod health;
pub mod payment_schedule;
pub mod project;
pub mod users;
pub mod workload_actual;
pub mod workload_plan;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login, /auth/register, /auth/refresh       public
/// /auth/logout, /auth/me                           any user
///
/// /users                                           list, create
/// /users/{id}                                      get, update, delete
/// /users/{id}/password                             reset password
/// /users/{id}/invalidate-sessions                  revoke all tokens
///
/// /company                                         list, create
/// /company/{id}                                    get, update, delete
///
/// /project                                         list, create
/// /project/{id}                                    get, update, delete
/// /project/{id}/users                              team
/// /project/{id}/users/{user_id}                    add, remove member
///
/// /construction                                    list, create
/// /construction/{id}                               get, update, delete
///
/// /document/upload                                 multipart upload
/// /document                                        list
/// /document/{id}                                   get, update, delete
/// /document/{id}/download                          file stream
/// /document/{id}/replace                           new version
///
/// /payment-schedule                                list, create
/// /payment-schedule/summary                        totals
/// /payment-schedule/{id}                           get, update, delete
///
/// /workload-plan                                   list, create
/// /workload-plan/my                                caller's plan
/// /workload-plan/bulk                              many users, one day
/// /workload-plan/{id}                              update, delete
///
/// /workload-actual                                 list, create
/// /workload-actual/my                              caller's entries
/// /workload-actual/{id}                            get, update, delete
///
/// /analytics/employee-work-hours                   hours vs expected
/// /analytics/projects-workload                     planned vs actual per day
/// /analytics/project-hours                         hours per project
/// /analytics/overview                              counts and totals
///
/// /chat-log                                        list (admin), append
/// /chat-log/my                                     caller's history
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/company", company::router())
        .nest("/project", project::router())
        .nest("/construction", construction::router())
        .nest("/document", document::router())
        .nest("/payment-schedule", payment_schedule::router())
        .nest("/workload-plan", workload_plan::router())
        .nest("/workload-actual", workload_actual::router())
        .nest("/analytics", analytics::router())
        .nest("/chat-log", chat_log::router())
}
