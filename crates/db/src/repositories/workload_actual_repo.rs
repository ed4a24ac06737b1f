//! Repository for `workload_actuals` and their `workload_distributions`.
//!
//! An actual entry and its distributions are always written together in
//! one transaction.

use std::collections::HashMap;

use sitebook_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::workload::{
    CreateWorkloadActual, DistributionInput, UpdateWorkloadActual, WorkloadActual,
    WorkloadActualFilter, WorkloadActualWithDistributions, WorkloadDistribution,
};

/// Selected by every query that returns a full row.
const COLUMNS: &str = "id, user_id, work_date, hours_worked, description, created_at, updated_at";

const DISTRIBUTION_SELECT: &str = "SELECT d.id, d.workload_actual_id, d.project_id, \
        p.name AS project_name, d.hours \
     FROM workload_distributions d \
     JOIN projects p ON p.id = d.project_id";

/// Daily hour reports and their per-project distribution.
pub struct WorkloadActualRepo;

impl WorkloadActualRepo {
    /// Insert an entry with its distributions. A second entry for the same
    /// user and date violates `uq_workload_actuals_user_date`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkloadActual,
    ) -> Result<WorkloadActualWithDistributions, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO workload_actuals (user_id, work_date, hours_worked, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let actual = sqlx::query_as::<_, WorkloadActual>(&query)
            .bind(input.user_id)
            .bind(input.work_date)
            .bind(input.hours_worked)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        insert_distributions(&mut tx, actual.id, &input.distributions).await?;
        tx.commit().await?;

        let distributions = Self::distributions_for(pool, &[actual.id]).await?;
        Ok(WorkloadActualWithDistributions {
            actual,
            distributions,
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkloadActual>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workload_actuals WHERE id = $1");
        sqlx::query_as::<_, WorkloadActual>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// An entry with its distributions.
    pub async fn find_with_distributions(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkloadActualWithDistributions>, sqlx::Error> {
        let Some(actual) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let distributions = Self::distributions_for(pool, &[actual.id]).await?;
        Ok(Some(WorkloadActualWithDistributions {
            actual,
            distributions,
        }))
    }

    /// Entries by date (newest first) with their distributions.
    pub async fn list(
        pool: &PgPool,
        filter: &WorkloadActualFilter,
    ) -> Result<Vec<WorkloadActualWithDistributions>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workload_actuals
             WHERE ($1::DATE IS NULL OR work_date >= $1)
               AND ($2::DATE IS NULL OR work_date <= $2)
               AND ($3::BIGINT IS NULL OR user_id = $3)
             ORDER BY work_date DESC, user_id, id"
        );
        let actuals = sqlx::query_as::<_, WorkloadActual>(&query)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.user_id)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = actuals.iter().map(|a| a.id).collect();
        let mut by_actual: HashMap<DbId, Vec<WorkloadDistribution>> = HashMap::new();
        for d in Self::distributions_for(pool, &ids).await? {
            by_actual.entry(d.workload_actual_id).or_default().push(d);
        }

        Ok(actuals
            .into_iter()
            .map(|actual| WorkloadActualWithDistributions {
                distributions: by_actual.remove(&actual.id).unwrap_or_default(),
                actual,
            })
            .collect())
    }

    /// Apply changes to an entry. When `input.distributions` is set, all
    /// existing distributions are replaced in the same transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkloadActual,
    ) -> Result<Option<WorkloadActualWithDistributions>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE workload_actuals SET
                hours_worked = COALESCE($2, hours_worked),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(actual) = sqlx::query_as::<_, WorkloadActual>(&query)
            .bind(id)
            .bind(input.hours_worked)
            .bind(&input.description)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(distributions) = &input.distributions {
            sqlx::query("DELETE FROM workload_distributions WHERE workload_actual_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_distributions(&mut tx, id, distributions).await?;
        }
        tx.commit().await?;

        let distributions = Self::distributions_for(pool, &[id]).await?;
        Ok(Some(WorkloadActualWithDistributions {
            actual,
            distributions,
        }))
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workload_actuals WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Distributions of the given entries, by project name.
    pub async fn distributions_for(
        pool: &PgPool,
        actual_ids: &[DbId],
    ) -> Result<Vec<WorkloadDistribution>, sqlx::Error> {
        if actual_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "{DISTRIBUTION_SELECT}
             WHERE d.workload_actual_id = ANY($1)
             ORDER BY d.workload_actual_id, p.name, d.id"
        );
        sqlx::query_as::<_, WorkloadDistribution>(&query)
            .bind(actual_ids)
            .fetch_all(pool)
            .await
    }
}

async fn insert_distributions(
    tx: &mut Transaction<'_, Postgres>,
    actual_id: DbId,
    distributions: &[DistributionInput],
) -> Result<(), sqlx::Error> {
    for d in distributions {
        sqlx::query(
            "INSERT INTO workload_distributions (workload_actual_id, project_id, hours)
             VALUES ($1, $2, $3)",
        )
        .bind(actual_id)
        .bind(d.project_id)
        .bind(d.hours)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
