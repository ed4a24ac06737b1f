//! Repository for the `companies` table.

use sitebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CreateCompany, UpdateCompany};
use crate::models::status::StatusId;

/// Selected by every query that returns a full row.
const COLUMNS: &str = "id, name, company_type_id, tax_id, contact_person, phone, email, \
                        address, notes, created_at, updated_at";

/// Provides CRUD operations for customer and contractor companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies
                (name, company_type_id, tax_id, contact_person, phone, email, address, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(input.company_type_id)
            .bind(&input.tax_id)
            .bind(&input.contact_person)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a company by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List companies by name, optionally by type and a case-insensitive
    /// substring of the name.
    pub async fn list(
        pool: &PgPool,
        company_type_id: Option<StatusId>,
        search: Option<&str>,
    ) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies
             WHERE ($1::SMALLINT IS NULL OR company_type_id = $1)
               AND ($2::TEXT IS NULL OR name ILIKE '%' || $2 || '%')
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(company_type_id)
            .bind(search)
            .fetch_all(pool)
            .await
    }

    /// Update a company. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = COALESCE($2, name),
                company_type_id = COALESCE($3, company_type_id),
                tax_id = COALESCE($4, tax_id),
                contact_person = COALESCE($5, contact_person),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email),
                address = COALESCE($8, address),
                notes = COALESCE($9, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.company_type_id)
            .bind(&input.tax_id)
            .bind(&input.contact_person)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Whether any project names the company as its customer or contractor.
    pub async fn is_referenced(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM projects WHERE customer_id = $1 OR contractor_id = $1
             )",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a company. A company that is the customer of any project is
    /// protected by a foreign key and the delete fails with 23503.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
