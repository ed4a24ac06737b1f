//! Request extractors for identity ([`auth::AuthUser`]) and role checks
//! ([`rbac`]).

pub mod auth;
pub mod rbac;
