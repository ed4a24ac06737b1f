//! Domain logic for the construction-project management backend.
//!
//! Everything here is pure: no database access, no HTTP, no filesystem.
//! The `db` and `api` crates call into these modules for validation and
//! for the arithmetic behind the analytics endpoints.

pub mod analytics;
pub mod chat;
pub mod documents;
pub mod error;
pub mod pagination;
pub mod payments;
pub mod projects;
pub mod roles;
pub mod types;
pub mod validation;
pub mod workload;
