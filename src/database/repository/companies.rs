use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Company, CompanyPatch};

const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

pub async fn list(pool: &PgPool, scope: Option<Uuid>) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!(
        "SELECT {COLUMNS} FROM companies
         WHERE ($1::uuid IS NULL OR id = $1)
         ORDER BY name ASC"
    ))
    .bind(scope)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!("SELECT {COLUMNS} FROM companies WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Case-sensitive name collision check, optionally excluding one row
/// (the row being renamed).
pub async fn name_exists(
    pool: &PgPool,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM companies WHERE name = $1 AND ($2::uuid IS NULL OR id != $2))",
    )
    .bind(name)
    .bind(exclude)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Company exists and is active; used before attaching users to it.
pub async fn is_active(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM companies WHERE id = $1 AND is_active = true)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn create(pool: &PgPool, name: &str, description: &str) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!(
        "INSERT INTO companies (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

/// Fixed partial-update routine: absent fields keep their current value.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    patch: &CompanyPatch,
) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!(
        "UPDATE companies SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            is_active = COALESCE($4, is_active),
            updated_at = NOW()
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(patch.name.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.is_active)
    .fetch_optional(pool)
    .await
}

pub async fn count_users(pool: &PgPool, company_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE company_id = $1")
        .bind(company_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
