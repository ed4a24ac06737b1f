//! Row structs (`FromRow`) and the insert/patch DTOs the repositories take.
//! Rows that leave the API derive `Serialize`; DTOs are plain structs.

pub mod analytics;
pub mod chat_log;
pub mod company;
pub mod construction;
pub mod document;
pub mod payment_schedule;
pub mod project;
pub mod session;
pub mod status;
pub mod user;
pub mod workload;
