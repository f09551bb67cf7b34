use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{CreateDeveloperRequest, Developer, DeveloperPatch};

const COLUMNS: &str =
    "id, name, role, latest_performance_score, team_id, company_id, archived_at, created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    scope: Option<Uuid>,
    include_archived: bool,
) -> Result<Vec<Developer>, sqlx::Error> {
    sqlx::query_as::<_, Developer>(&format!(
        "SELECT {COLUMNS} FROM developers
         WHERE ($1::uuid IS NULL OR company_id = $1)
           AND ($2 OR archived_at IS NULL)
         ORDER BY created_at DESC"
    ))
    .bind(scope)
    .bind(include_archived)
    .fetch_all(pool)
    .await
}

pub async fn list_archived(pool: &PgPool, scope: Option<Uuid>) -> Result<Vec<Developer>, sqlx::Error> {
    sqlx::query_as::<_, Developer>(&format!(
        "SELECT {COLUMNS} FROM developers
         WHERE ($1::uuid IS NULL OR company_id = $1)
           AND archived_at IS NOT NULL
         ORDER BY archived_at DESC"
    ))
    .bind(scope)
    .fetch_all(pool)
    .await
}

pub async fn list_by_team(
    pool: &PgPool,
    team_id: Uuid,
    include_archived: bool,
) -> Result<Vec<Developer>, sqlx::Error> {
    sqlx::query_as::<_, Developer>(&format!(
        "SELECT {COLUMNS} FROM developers
         WHERE team_id = $1
           AND ($2 OR archived_at IS NULL)
         ORDER BY created_at DESC"
    ))
    .bind(team_id)
    .bind(include_archived)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Developer>, sqlx::Error> {
    sqlx::query_as::<_, Developer>(&format!("SELECT {COLUMNS} FROM developers WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    req: &CreateDeveloperRequest,
    company_id: Uuid,
) -> Result<Developer, sqlx::Error> {
    sqlx::query_as::<_, Developer>(&format!(
        "INSERT INTO developers (name, role, team_id, company_id)
         VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(&req.name)
    .bind(&req.role)
    .bind(req.team_id)
    .bind(company_id)
    .fetch_one(pool)
    .await
}

/// Fixed partial-update routine: absent fields keep their current value.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    patch: &DeveloperPatch,
) -> Result<Option<Developer>, sqlx::Error> {
    sqlx::query_as::<_, Developer>(&format!(
        "UPDATE developers SET
            name = COALESCE($2, name),
            role = COALESCE($3, role),
            latest_performance_score = COALESCE($4, latest_performance_score),
            team_id = COALESCE($5, team_id),
            updated_at = NOW()
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(patch.name.as_deref())
    .bind(patch.role.as_deref())
    .bind(patch.latest_performance_score)
    .bind(patch.team_id)
    .fetch_optional(pool)
    .await
}

/// Reversible archive: sets or clears the timestamp, never deletes data.
pub async fn set_archived(
    pool: &PgPool,
    id: Uuid,
    archive: bool,
) -> Result<Option<Developer>, sqlx::Error> {
    sqlx::query_as::<_, Developer>(&format!(
        "UPDATE developers SET
            archived_at = CASE WHEN $2 THEN NOW() ELSE NULL END,
            updated_at = NOW()
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(archive)
    .fetch_optional(pool)
    .await
}

/// Removes the developer and every report that belongs to it in one
/// transaction; a failure at any step leaves both tables untouched.
pub async fn delete_with_reports(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM performance_reports WHERE developer_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM developers WHERE id = $1").bind(id).execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM developers WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Denormalized cache of the newest report's weighted average.
pub async fn update_latest_score(pool: &PgPool, id: Uuid, score: Decimal) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE developers SET latest_performance_score = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(score)
    .execute(pool)
    .await?;
    Ok(())
}
