use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Team, TeamPatch};

const COLUMNS: &str = "id, name, description, color, company_id, created_at, updated_at";

pub async fn list(pool: &PgPool, scope: Option<Uuid>) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!(
        "SELECT {COLUMNS} FROM teams
         WHERE ($1::uuid IS NULL OR company_id = $1)
         ORDER BY created_at DESC"
    ))
    .bind(scope)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!("SELECT {COLUMNS} FROM teams WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: &str,
    color: &str,
    company_id: Uuid,
) -> Result<Team, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!(
        "INSERT INTO teams (name, description, color, company_id)
         VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(description)
    .bind(color)
    .bind(company_id)
    .fetch_one(pool)
    .await
}

/// Fixed partial-update routine: absent fields keep their current value.
pub async fn update(pool: &PgPool, id: Uuid, patch: &TeamPatch) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!(
        "UPDATE teams SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            color = COALESCE($4, color),
            updated_at = NOW()
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(patch.name.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.color.as_deref())
    .fetch_optional(pool)
    .await
}

/// Deleting a team detaches its developers rather than cascading into
/// them; both statements commit or roll back together.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE developers SET team_id = NULL, updated_at = NOW() WHERE team_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM teams WHERE id = $1").bind(id).execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}
