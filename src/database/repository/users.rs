use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Role, User, UserPatch};

const COLUMNS: &str =
    "id, email, password, name, role, company_id, needs_password_change, is_active, created_at, updated_at";

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users").fetch_one(pool).await?;
    Ok(count)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Lookup for login; inactive accounts are returned too, the handler
/// decides what an inactive match means.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn email_exists(
    pool: &PgPool,
    email: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::uuid IS NULL OR id != $2))",
    )
    .bind(email)
    .bind(exclude)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn list(pool: &PgPool, scope: Option<Uuid>) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users
         WHERE ($1::uuid IS NULL OR company_id = $1)
         ORDER BY created_at DESC"
    ))
    .bind(scope)
    .fetch_all(pool)
    .await
}

pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub role: Role,
    pub company_id: Option<Uuid>,
    pub needs_password_change: bool,
}

pub async fn create(pool: &PgPool, user: NewUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, password, name, role, company_id, needs_password_change)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {COLUMNS}"
    ))
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.name)
    .bind(user.role.as_str())
    .bind(user.company_id)
    .bind(user.needs_password_change)
    .fetch_one(pool)
    .await
}

/// Fixed partial-update routine: absent fields keep their current value.
pub async fn update(pool: &PgPool, id: Uuid, patch: &UserPatch) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            role = COALESCE($4, role),
            company_id = COALESCE($5, company_id),
            is_active = COALESCE($6, is_active),
            updated_at = NOW()
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(patch.name.as_deref())
    .bind(patch.email.as_deref())
    .bind(patch.role.map(|r| r.as_str()))
    .bind(patch.company_id)
    .bind(patch.is_active)
    .fetch_optional(pool)
    .await
}

/// Replace the stored hash; optionally clears the must-change flag in the
/// same statement (set-new-password does, change-password keeps it as-is).
pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
    clear_change_flag: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET
            password = $2,
            needs_password_change = CASE WHEN $3 THEN false ELSE needs_password_change END,
            updated_at = NOW()
         WHERE id = $1",
    )
    .bind(id)
    .bind(password_hash)
    .bind(clear_change_flag)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}
