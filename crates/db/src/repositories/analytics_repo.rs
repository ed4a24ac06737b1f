//! Read-only queries behind the analytics endpoints.
//!
//! Aggregation happens in `sitebook_core::analytics` and
//! `sitebook_core::workload`; these return flat rows.

use sitebook_core::types::{Day, DbId};
use sqlx::PgPool;

use crate::models::analytics::{BookedRow, NamedCount, PlannedRow, ReportedDayRow};
use crate::models::status::StatusId;

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// One row per planned assignment on `date`, for projects in `status_id`.
    pub async fn planned_on(
        pool: &PgPool,
        date: Day,
        status_id: StatusId,
    ) -> Result<Vec<PlannedRow>, sqlx::Error> {
        sqlx::query_as::<_, PlannedRow>(
            "SELECT wp.project_id, p.name AS project_name, wp.user_id
             FROM workload_plans wp
             JOIN projects p ON p.id = wp.project_id
             WHERE wp.work_date = $1 AND p.status_id = $2",
        )
        .bind(date)
        .bind(status_id)
        .fetch_all(pool)
        .await
    }

    /// One row per distribution booked on `date`, for projects in `status_id`.
    pub async fn booked_on(
        pool: &PgPool,
        date: Day,
        status_id: StatusId,
    ) -> Result<Vec<BookedRow>, sqlx::Error> {
        sqlx::query_as::<_, BookedRow>(
            "SELECT d.project_id, p.name AS project_name, a.user_id, d.hours
             FROM workload_distributions d
             JOIN workload_actuals a ON a.id = d.workload_actual_id
             JOIN projects p ON p.id = d.project_id
             WHERE a.work_date = $1 AND p.status_id = $2",
        )
        .bind(date)
        .bind(status_id)
        .fetch_all(pool)
        .await
    }

    /// Distributions booked in `[start, end]`, optionally for one project.
    pub async fn booked_between(
        pool: &PgPool,
        start: Day,
        end: Day,
        project_id: Option<DbId>,
    ) -> Result<Vec<BookedRow>, sqlx::Error> {
        sqlx::query_as::<_, BookedRow>(
            "SELECT d.project_id, p.name AS project_name, a.user_id, d.hours
             FROM workload_distributions d
             JOIN workload_actuals a ON a.id = d.workload_actual_id
             JOIN projects p ON p.id = d.project_id
             WHERE a.work_date BETWEEN $1 AND $2
               AND ($3::BIGINT IS NULL OR d.project_id = $3)",
        )
        .bind(start)
        .bind(end)
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Actual entries in `[start, end]`, optionally for one user.
    pub async fn reported_days(
        pool: &PgPool,
        start: Day,
        end: Day,
        user_id: Option<DbId>,
    ) -> Result<Vec<ReportedDayRow>, sqlx::Error> {
        sqlx::query_as::<_, ReportedDayRow>(
            "SELECT user_id, work_date, hours_worked
             FROM workload_actuals
             WHERE work_date BETWEEN $1 AND $2
               AND ($3::BIGINT IS NULL OR user_id = $3)",
        )
        .bind(start)
        .bind(end)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Project count per status, including zero counts.
    pub async fn projects_by_status(pool: &PgPool) -> Result<Vec<NamedCount>, sqlx::Error> {
        sqlx::query_as::<_, NamedCount>(
            "SELECT s.name, COUNT(p.id) AS count
             FROM project_statuses s
             LEFT JOIN projects p ON p.status_id = s.id
             GROUP BY s.id, s.name
             ORDER BY s.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Company count per type, including zero counts.
    pub async fn companies_by_type(pool: &PgPool) -> Result<Vec<NamedCount>, sqlx::Error> {
        sqlx::query_as::<_, NamedCount>(
            "SELECT t.name, COUNT(c.id) AS count
             FROM company_types t
             LEFT JOIN companies c ON c.company_type_id = t.id
             GROUP BY t.id, t.name
             ORDER BY t.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Active user count per role, including zero counts.
    pub async fn users_by_role(pool: &PgPool) -> Result<Vec<NamedCount>, sqlx::Error> {
        sqlx::query_as::<_, NamedCount>(
            "SELECT r.name, COUNT(u.id) AS count
             FROM roles r
             LEFT JOIN users u ON u.role_id = r.id AND u.is_active
             GROUP BY r.id, r.name
             ORDER BY r.id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn document_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
