//! Repository for the `constructions` table.

use sitebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::construction::{Construction, CreateConstruction, UpdateConstruction};

const COLUMNS: &str = "id, project_id, name, description, address, created_at, updated_at";

pub struct ConstructionRepo;

impl ConstructionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateConstruction,
    ) -> Result<Construction, sqlx::Error> {
        let query = format!(
            "INSERT INTO constructions (project_id, name, description, address)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Construction>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Construction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM constructions WHERE id = $1");
        sqlx::query_as::<_, Construction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Constructions of a project, by name.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Construction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM constructions WHERE project_id = $1 ORDER BY name, id"
        );
        sqlx::query_as::<_, Construction>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateConstruction,
    ) -> Result<Option<Construction>, sqlx::Error> {
        let query = format!(
            "UPDATE constructions SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Construction>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.address)
            .fetch_optional(pool)
            .await
    }

    /// Delete a construction. Its documents stay on the project with
    /// `construction_id` cleared.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM constructions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
