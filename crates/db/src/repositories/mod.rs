//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod analytics_repo;
pub mod chat_log_repo;
pub mod company_repo;
pub mod construction_repo;
pub mod document_repo;
pub mod payment_schedule_repo;
pub mod project_member_repo;
pub mod project_repo;
pub mod session_repo;
pub mod user_repo;
pub mod workload_actual_repo;
pub mod workload_plan_repo;

pub use analytics_repo::AnalyticsRepo;
pub use chat_log_repo::ChatLogRepo;
pub use company_repo::CompanyRepo;
pub use construction_repo::ConstructionRepo;
pub use document_repo::DocumentRepo;
pub use payment_schedule_repo::PaymentScheduleRepo;
pub use project_member_repo::ProjectMemberRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use workload_actual_repo::WorkloadActualRepo;
pub use workload_plan_repo::WorkloadPlanRepo;
