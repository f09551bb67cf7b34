use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{CreatePerformanceReportRequest, PerformanceReport, PerformanceStats};

const COLUMNS: &str = "id, developer_id, month, question_scores, category_scores, \
                       weighted_average_score, highlights, points_to_develop, created_at, updated_at";

pub async fn list(pool: &PgPool) -> Result<Vec<PerformanceReport>, sqlx::Error> {
    sqlx::query_as::<_, PerformanceReport>(&format!(
        "SELECT {COLUMNS} FROM performance_reports
         ORDER BY month DESC, created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn list_by_developer(
    pool: &PgPool,
    developer_id: Uuid,
) -> Result<Vec<PerformanceReport>, sqlx::Error> {
    sqlx::query_as::<_, PerformanceReport>(&format!(
        "SELECT {COLUMNS} FROM performance_reports
         WHERE developer_id = $1
         ORDER BY month DESC, created_at DESC"
    ))
    .bind(developer_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_month(pool: &PgPool, month: &str) -> Result<Vec<PerformanceReport>, sqlx::Error> {
    sqlx::query_as::<_, PerformanceReport>(&format!(
        "SELECT {COLUMNS} FROM performance_reports
         WHERE month = $1
         ORDER BY weighted_average_score DESC, created_at DESC"
    ))
    .bind(month)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PerformanceReport>, sqlx::Error> {
    sqlx::query_as::<_, PerformanceReport>(&format!(
        "SELECT {COLUMNS} FROM performance_reports WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// One report per (developer, month); checked before every insert.
pub async fn exists_for_month(
    pool: &PgPool,
    developer_id: Uuid,
    month: &str,
) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM performance_reports WHERE developer_id = $1 AND month = $2)",
    )
    .bind(developer_id)
    .bind(month)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn create(
    pool: &PgPool,
    req: &CreatePerformanceReportRequest,
) -> Result<PerformanceReport, sqlx::Error> {
    sqlx::query_as::<_, PerformanceReport>(&format!(
        "INSERT INTO performance_reports
            (developer_id, month, question_scores, category_scores,
             weighted_average_score, highlights, points_to_develop)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    ))
    .bind(req.developer_id)
    .bind(&req.month)
    .bind(&req.question_scores)
    .bind(&req.category_scores)
    .bind(req.weighted_average_score)
    .bind(&req.highlights)
    .bind(&req.points_to_develop)
    .fetch_one(pool)
    .await
}

/// Months that have at least one report, newest first.
pub async fn months(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT month FROM performance_reports ORDER BY month DESC")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(m,)| m).collect())
}

pub async fn stats(pool: &PgPool) -> Result<PerformanceStats, sqlx::Error> {
    sqlx::query_as::<_, PerformanceStats>(
        "SELECT
            COUNT(*) AS total_reports,
            COALESCE(ROUND(AVG(weighted_average_score), 2), 0) AS average_score,
            COALESCE(MAX(weighted_average_score), 0) AS highest_score,
            COALESCE(MIN(weighted_average_score), 0) AS lowest_score
         FROM performance_reports",
    )
    .fetch_one(pool)
    .await
}
