//! Repository for the `projects` table.

use sitebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectFilter, ProjectListItem, UpdateProject};
use crate::models::status::{ProjectStatus, StatusId};

const COLUMNS: &str = "id, name, code, description, customer_id, contractor_id, manager_id, \
                        status_id, start_date, end_date, contract_amount, created_at, updated_at";

/// Listing select: project columns prefixed with `p.` plus joined names.
const LIST_SELECT: &str = "SELECT p.id, p.name, p.code, p.description, p.customer_id, \
        p.contractor_id, p.manager_id, p.status_id, p.start_date, p.end_date, \
        p.contract_amount, p.created_at, p.updated_at, \
        s.name AS status, \
        cu.name AS customer_name, \
        co.name AS contractor_name, \
        m.full_name AS manager_name, \
        (SELECT COUNT(*) FROM project_members pm WHERE pm.project_id = p.id) AS member_count \
     FROM projects p \
     JOIN project_statuses s ON s.id = p.status_id \
     JOIN companies cu ON cu.id = p.customer_id \
     LEFT JOIN companies co ON co.id = p.contractor_id \
     JOIN users m ON m.id = p.manager_id";

/// Visibility predicate on `p` for user `$n`: the manager or a team member.
fn visible_to_clause(param: u8) -> String {
    format!(
        "(${param}::BIGINT IS NULL OR p.manager_id = ${param} OR EXISTS (\
            SELECT 1 FROM project_members pm \
            WHERE pm.project_id = p.id AND pm.user_id = ${param}))"
    )
}

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project. Defaults (manager, status) are resolved by the caller.
    ///
    /// `manager_id` is resolved by the caller; status defaults to Active.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        manager_id: DbId,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (name, code, description, customer_id, contractor_id, manager_id,
                 status_id, start_date, end_date, contract_amount)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, $11), $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.description)
            .bind(input.customer_id)
            .bind(input.contractor_id)
            .bind(manager_id)
            .bind(input.status_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.contract_amount)
            .bind(ProjectStatus::Active.id())
            .fetch_one(pool)
            .await
    }

    /// Find a project row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project with its joined names, if visible to `visible_to`
    /// (`None` means unrestricted).
    pub async fn find_list_item(
        pool: &PgPool,
        id: DbId,
        visible_to: Option<DbId>,
    ) -> Result<Option<ProjectListItem>, sqlx::Error> {
        let query = format!("{LIST_SELECT} WHERE p.id = $1 AND {}", visible_to_clause(2));
        sqlx::query_as::<_, ProjectListItem>(&query)
            .bind(id)
            .bind(visible_to)
            .fetch_optional(pool)
            .await
    }

    /// List projects by name with optional filters.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
    ) -> Result<Vec<ProjectListItem>, sqlx::Error> {
        let query = format!(
            "{LIST_SELECT}
             WHERE ($1::SMALLINT IS NULL OR p.status_id = $1)
               AND ($2::BIGINT IS NULL OR p.customer_id = $2)
               AND {}
             ORDER BY p.name, p.id",
            visible_to_clause(3)
        );
        sqlx::query_as::<_, ProjectListItem>(&query)
            .bind(filter.status_id)
            .bind(filter.customer_id)
            .bind(filter.visible_to)
            .fetch_all(pool)
            .await
    }

    /// Projects ordered by a customer company.
    pub async fn list_by_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE customer_id = $1 ORDER BY name, id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// `(id, name)` of every project with the given status, by name.
    pub async fn list_names_by_status(
        pool: &PgPool,
        status_id: StatusId,
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, name FROM projects WHERE status_id = $1 ORDER BY name, id",
        )
        .bind(status_id)
        .fetch_all(pool)
        .await
    }

    /// Whether `user_id` manages or is a member of the project.
    pub async fn is_visible_to(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM projects p
                WHERE p.id = $1
                  AND (p.manager_id = $2 OR EXISTS (
                      SELECT 1 FROM project_members pm
                      WHERE pm.project_id = p.id AND pm.user_id = $2)))",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                code = COALESCE($3, code),
                description = COALESCE($4, description),
                customer_id = COALESCE($5, customer_id),
                contractor_id = COALESCE($6, contractor_id),
                manager_id = COALESCE($7, manager_id),
                status_id = COALESCE($8, status_id),
                start_date = COALESCE($9, start_date),
                end_date = COALESCE($10, end_date),
                contract_amount = COALESCE($11, contract_amount)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.description)
            .bind(input.customer_id)
            .bind(input.contractor_id)
            .bind(input.manager_id)
            .bind(input.status_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.contract_amount)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and, through cascades, its constructions, documents,
    /// payment entries, team links, plans and distributions.
    ///
    /// The project row is locked first so no document can be attached while
    /// the stored names are read. Returns the stored file names of the
    /// removed documents, or `None` if the project does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let stored_names: Vec<(String,)> =
            sqlx::query_as("SELECT stored_name FROM documents WHERE project_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(stored_names.into_iter().map(|r| r.0).collect()))
    }
}
