//! Repository for the `project_members` table (project teams).

use sitebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::ProjectMember;

pub struct ProjectMemberRepo;

impl ProjectMemberRepo {
    /// Add a user to a project team. A duplicate violates
    /// `uq_project_members_project_user`.
    pub async fn add(pool: &PgPool, project_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)")
            .bind(project_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove a user from a project team. Returns `true` if they were a member.
    pub async fn remove(pool: &PgPool, project_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Team members of a project, by name.
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<ProjectMember>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            "SELECT u.id AS user_id, u.full_name, u.email, r.name AS role, u.position,
                    pm.added_at
             FROM project_members pm
             JOIN users u ON u.id = pm.user_id
             JOIN roles r ON r.id = u.role_id
             WHERE pm.project_id = $1
             ORDER BY u.full_name, u.id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Whether `user_id` is on the team of `project_id`.
    pub async fn is_member(pool: &PgPool, project_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM project_members WHERE project_id = $1 AND user_id = $2)",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
