//! Request handlers, one submodule per resource.
//!
//! Handlers check access through the extractors in [`crate::middleware`],
//! validate input, delegate to the repositories in `sitebook_db` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod access;
pub mod analytics;
pub mod auth;
pub mod chat_log;
pub mod company;
pub mod construction;
pub mod document;
pub mod payment_schedule;
pub mod project;
pub mod users;
pub mod workload_actual;
pub mod workload_plan;
