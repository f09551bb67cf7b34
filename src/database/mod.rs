pub mod migrations;
pub mod models;
pub mod repository;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseConfig;

/// Open the connection pool. Called once at startup; an unreachable
/// database is a fatal error and the process exits non-zero.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await
}
