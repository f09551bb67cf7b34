use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;

/// Explicitly constructed per-process context, handed to every handler
/// through axum state instead of living in a global.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        Self { pool, config: Arc::new(config) }
    }
}
