//! Repository for the `workload_plans` table.

use sitebook_core::types::{Day, DbId};
use sqlx::PgPool;

use crate::models::workload::{
    CreateWorkloadPlan, UpdateWorkloadPlan, WorkloadPlan, WorkloadPlanEntry, WorkloadPlanFilter,
};

const COLUMNS: &str = "id, user_id, project_id, work_date, created_by, created_at, updated_at";

const ENTRY_SELECT: &str = "SELECT wp.id, wp.user_id, u.full_name AS user_name, wp.project_id, \
        p.name AS project_name, wp.work_date, wp.created_by \
     FROM workload_plans wp \
     JOIN users u ON u.id = wp.user_id \
     JOIN projects p ON p.id = wp.project_id";

/// Planned assignments of users to projects, one row per user, project and day.
pub struct WorkloadPlanRepo;

impl WorkloadPlanRepo {
    /// Insert one assignment. A duplicate `(user, project, date)` violates
    /// `uq_workload_plans_user_project_date`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkloadPlan,
        created_by: DbId,
    ) -> Result<WorkloadPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO workload_plans (user_id, project_id, work_date, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkloadPlan>(&query)
            .bind(input.user_id)
            .bind(input.project_id)
            .bind(input.work_date)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Assign several users to one project on one day in a single
    /// transaction. Existing assignments are skipped; only new rows are
    /// returned.
    pub async fn create_bulk(
        pool: &PgPool,
        user_ids: &[DbId],
        project_id: DbId,
        work_date: Day,
        created_by: DbId,
    ) -> Result<Vec<WorkloadPlan>, sqlx::Error> {
        let query = format!(
            "INSERT INTO workload_plans (user_id, project_id, work_date, created_by)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id, project_id, work_date) DO NOTHING
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(user_ids.len());
        for &user_id in user_ids {
            let row = sqlx::query_as::<_, WorkloadPlan>(&query)
                .bind(user_id)
                .bind(project_id)
                .bind(work_date)
                .bind(created_by)
                .fetch_optional(&mut *tx)
                .await?;
            created.extend(row);
        }
        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkloadPlan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workload_plans WHERE id = $1");
        sqlx::query_as::<_, WorkloadPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Entries with names, by date then user name.
    pub async fn list(
        pool: &PgPool,
        filter: &WorkloadPlanFilter,
    ) -> Result<Vec<WorkloadPlanEntry>, sqlx::Error> {
        let query = format!(
            "{ENTRY_SELECT}
             WHERE ($1::DATE IS NULL OR wp.work_date >= $1)
               AND ($2::DATE IS NULL OR wp.work_date <= $2)
               AND ($3::BIGINT IS NULL OR wp.user_id = $3)
               AND ($4::BIGINT IS NULL OR wp.project_id = $4)
             ORDER BY wp.work_date, u.full_name, wp.id"
        );
        sqlx::query_as::<_, WorkloadPlanEntry>(&query)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.user_id)
            .bind(filter.project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkloadPlan,
    ) -> Result<Option<WorkloadPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE workload_plans SET
                project_id = COALESCE($2, project_id),
                work_date = COALESCE($3, work_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkloadPlan>(&query)
            .bind(id)
            .bind(input.project_id)
            .bind(input.work_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workload_plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
