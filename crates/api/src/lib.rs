//! HTTP layer of the construction-office backend: configuration, auth,
//! handlers and the document store. `main.rs` and the integration tests
//! both assemble the app from [`router::build_app_router`].

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
