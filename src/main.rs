use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use perftrack_api::config::AppConfig;
use perftrack_api::state::AppState;
use perftrack_api::{database, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DB_* and JWT_SECRET
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!("starting perftrack-api in {:?} mode", config.environment);

    // Unreachable database or a failing migration is fatal: exit non-zero
    // rather than serve requests against an unknown schema.
    let pool = database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    tracing::info!("database connection established");

    database::migrations::run(&pool).await.context("database migrations failed")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(pool, config);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
