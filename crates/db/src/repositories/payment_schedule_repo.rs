//! Repository for the `payment_schedules` table.

use sitebook_core::payments::PaymentLine;
use sitebook_core::types::{Day, DbId};
use sqlx::PgPool;

use crate::models::payment_schedule::{PaymentSchedule, PaymentScheduleValues};

const COLUMNS: &str = "id, project_id, stage_name, amount, expected_date, actual_date, is_paid, \
                        notes, created_at, updated_at";

/// Provides CRUD operations for payment schedule entries.
pub struct PaymentScheduleRepo;

impl PaymentScheduleRepo {
    pub async fn create(
        pool: &PgPool,
        values: &PaymentScheduleValues,
    ) -> Result<PaymentSchedule, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_schedules
                (project_id, stage_name, amount, expected_date, actual_date, is_paid, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentSchedule>(&query)
            .bind(values.project_id)
            .bind(&values.stage_name)
            .bind(values.amount)
            .bind(values.expected_date)
            .bind(values.actual_date)
            .bind(values.is_paid)
            .bind(&values.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PaymentSchedule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_schedules WHERE id = $1");
        sqlx::query_as::<_, PaymentSchedule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Entries by expected date, optionally for one project.
    pub async fn list(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<Vec<PaymentSchedule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_schedules
             WHERE ($1::BIGINT IS NULL OR project_id = $1)
             ORDER BY expected_date, id"
        );
        sqlx::query_as::<_, PaymentSchedule>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Amount, due date and paid flag of entries, optionally for one project.
    pub async fn lines(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<Vec<PaymentLine>, sqlx::Error> {
        let rows: Vec<(f64, Day, bool)> = sqlx::query_as(
            "SELECT amount, expected_date, is_paid FROM payment_schedules
             WHERE ($1::BIGINT IS NULL OR project_id = $1)",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(amount, expected_date, is_paid)| PaymentLine {
                amount,
                expected_date,
                is_paid,
            })
            .collect())
    }

    /// Overwrite an entry with fully resolved values. The project is fixed
    /// at creation and is not changed here.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        values: &PaymentScheduleValues,
    ) -> Result<Option<PaymentSchedule>, sqlx::Error> {
        let query = format!(
            "UPDATE payment_schedules SET
                stage_name = $2,
                amount = $3,
                expected_date = $4,
                actual_date = $5,
                is_paid = $6,
                notes = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentSchedule>(&query)
            .bind(id)
            .bind(&values.stage_name)
            .bind(values.amount)
            .bind(values.expected_date)
            .bind(values.actual_date)
            .bind(values.is_paid)
            .bind(&values.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payment_schedules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
