//! Ordered, idempotent schema migrations tracked in a persisted ledger.
//!
//! Each unit applies at most once: its statements and its ledger record
//! commit in the same transaction, so a failed unit rolls back whole and
//! the run aborts. The statements themselves are guarded
//! (`CREATE ... IF NOT EXISTS`, conditional `ALTER`), so retrying a
//! partially-failed sequence from the top is always safe.

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool};
use std::collections::HashMap;
use tracing::info;

pub struct Migration {
    pub id: &'static str,
    pub description: &'static str,
    pub sql: &'static str,
}

/// Per-unit view for the status report: applied timestamp, or pending.
#[derive(Debug)]
pub struct MigrationStatus {
    pub id: &'static str,
    pub description: &'static str,
    pub applied_at: Option<DateTime<Utc>>,
}

/// All known units, ordered lexicographically by id. The order is the
/// application order and must never be reshuffled once a unit has shipped.
pub fn all() -> Vec<Migration> {
    let mut migrations = vec![
        Migration {
            id: "001_initial_setup",
            description: "Extensão uuid-ossp",
            sql: MIGRATION_001,
        },
        Migration {
            id: "002_create_tables",
            description: "Criação das tabelas principais",
            sql: MIGRATION_002,
        },
        Migration {
            id: "003_create_indexes",
            description: "Índices para as consultas mais comuns",
            sql: MIGRATION_003,
        },
        Migration {
            id: "004_create_triggers",
            description: "Triggers de updated_at",
            sql: MIGRATION_004,
        },
        Migration {
            id: "005_multitenant_columns",
            description: "Colunas company_id para instalações antigas",
            sql: MIGRATION_005,
        },
    ];
    migrations.sort_by(|a, b| a.id.cmp(b.id));
    migrations
}

/// Apply every pending unit in order. Returns how many were applied.
pub async fn run(pool: &PgPool) -> Result<usize, sqlx::Error> {
    ensure_ledger(pool).await?;
    let applied = applied_at_by_id(pool).await?;

    let mut count = 0;
    for migration in all() {
        if applied.contains_key(migration.id) {
            continue;
        }
        info!("applying migration {}: {}", migration.id, migration.description);

        let mut tx = pool.begin().await?;
        (&mut *tx).execute(migration.sql).await?;
        sqlx::query("INSERT INTO schema_migrations (id, description) VALUES ($1, $2)")
            .bind(migration.id)
            .bind(migration.description)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        count += 1;
    }

    if count == 0 {
        info!("no pending migrations");
    } else {
        info!("{count} migration(s) applied");
    }
    Ok(count)
}

/// Read-only view over the ledger, one entry per known unit.
pub async fn status(pool: &PgPool) -> Result<Vec<MigrationStatus>, sqlx::Error> {
    ensure_ledger(pool).await?;
    let applied = applied_at_by_id(pool).await?;

    Ok(all()
        .into_iter()
        .map(|m| MigrationStatus {
            id: m.id,
            description: m.description,
            applied_at: applied.get(m.id).copied(),
        })
        .collect())
}

async fn ensure_ledger(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            id VARCHAR(255) PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn applied_at_by_id(pool: &PgPool) -> Result<HashMap<String, DateTime<Utc>>, sqlx::Error> {
    let rows: Vec<(String, DateTime<Utc>)> =
        sqlx::query_as("SELECT id, applied_at FROM schema_migrations")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}

const MIGRATION_001: &str = r#"
CREATE EXTENSION IF NOT EXISTS "uuid-ossp";
"#;

const MIGRATION_002: &str = r#"
CREATE TABLE IF NOT EXISTS companies (
    id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
    name VARCHAR(255) NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    role VARCHAR(50) NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'manager', 'user')),
    company_id UUID REFERENCES companies(id) ON DELETE SET NULL,
    needs_password_change BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS teams (
    id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
    name VARCHAR(255) NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    color VARCHAR(50) NOT NULL DEFAULT 'blue',
    company_id UUID REFERENCES companies(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS developers (
    id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
    name VARCHAR(255) NOT NULL,
    role VARCHAR(255) NOT NULL,
    latest_performance_score DECIMAL(4,2) NOT NULL DEFAULT 0.00,
    team_id UUID REFERENCES teams(id) ON DELETE SET NULL,
    company_id UUID REFERENCES companies(id) ON DELETE CASCADE,
    archived_at TIMESTAMPTZ NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS performance_reports (
    id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
    developer_id UUID NOT NULL REFERENCES developers(id) ON DELETE CASCADE,
    month VARCHAR(7) NOT NULL,
    question_scores JSONB NOT NULL,
    category_scores JSONB NOT NULL,
    weighted_average_score DECIMAL(4,2) NOT NULL,
    highlights TEXT NOT NULL DEFAULT '',
    points_to_develop TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

const MIGRATION_003: &str = r#"
CREATE INDEX IF NOT EXISTS idx_companies_name ON companies(name);
CREATE INDEX IF NOT EXISTS idx_companies_is_active ON companies(is_active);

CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);
CREATE INDEX IF NOT EXISTS idx_users_is_active ON users(is_active);
CREATE INDEX IF NOT EXISTS idx_users_company_id ON users(company_id);

CREATE INDEX IF NOT EXISTS idx_teams_company_id ON teams(company_id);

CREATE INDEX IF NOT EXISTS idx_developers_team_id ON developers(team_id);
CREATE INDEX IF NOT EXISTS idx_developers_company_id ON developers(company_id);
CREATE INDEX IF NOT EXISTS idx_developers_archived_at ON developers(archived_at);

CREATE INDEX IF NOT EXISTS idx_performance_reports_developer_id ON performance_reports(developer_id);
CREATE INDEX IF NOT EXISTS idx_performance_reports_month ON performance_reports(month);
CREATE INDEX IF NOT EXISTS idx_performance_reports_developer_month ON performance_reports(developer_id, month);
"#;

const MIGRATION_004: &str = r#"
CREATE OR REPLACE FUNCTION update_updated_at_column()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE 'plpgsql';

DROP TRIGGER IF EXISTS update_companies_updated_at ON companies;
CREATE TRIGGER update_companies_updated_at
    BEFORE UPDATE ON companies
    FOR EACH ROW
    EXECUTE FUNCTION update_updated_at_column();

DROP TRIGGER IF EXISTS update_users_updated_at ON users;
CREATE TRIGGER update_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW
    EXECUTE FUNCTION update_updated_at_column();

DROP TRIGGER IF EXISTS update_teams_updated_at ON teams;
CREATE TRIGGER update_teams_updated_at
    BEFORE UPDATE ON teams
    FOR EACH ROW
    EXECUTE FUNCTION update_updated_at_column();

DROP TRIGGER IF EXISTS update_developers_updated_at ON developers;
CREATE TRIGGER update_developers_updated_at
    BEFORE UPDATE ON developers
    FOR EACH ROW
    EXECUTE FUNCTION update_updated_at_column();

DROP TRIGGER IF EXISTS update_performance_reports_updated_at ON performance_reports;
CREATE TRIGGER update_performance_reports_updated_at
    BEFORE UPDATE ON performance_reports
    FOR EACH ROW
    EXECUTE FUNCTION update_updated_at_column();
"#;

// Upgrades installations that predate tenant isolation; a fresh 002 schema
// already has these columns, so every block is a conditional no-op.
const MIGRATION_005: &str = r#"
DO $$
BEGIN
    IF NOT EXISTS (SELECT 1 FROM information_schema.columns WHERE table_name='users' AND column_name='company_id') THEN
        ALTER TABLE users ADD COLUMN company_id UUID REFERENCES companies(id) ON DELETE SET NULL;
    END IF;
END $$;

DO $$
BEGIN
    IF NOT EXISTS (SELECT 1 FROM information_schema.columns WHERE table_name='teams' AND column_name='company_id') THEN
        ALTER TABLE teams ADD COLUMN company_id UUID REFERENCES companies(id) ON DELETE CASCADE;
    END IF;
END $$;

DO $$
BEGIN
    IF NOT EXISTS (SELECT 1 FROM information_schema.columns WHERE table_name='developers' AND column_name='company_id') THEN
        ALTER TABLE developers ADD COLUMN company_id UUID REFERENCES companies(id) ON DELETE CASCADE;
    END IF;
END $$;

CREATE INDEX IF NOT EXISTS idx_users_company_id ON users(company_id);
CREATE INDEX IF NOT EXISTS idx_teams_company_id ON teams(company_id);
CREATE INDEX IF NOT EXISTS idx_developers_company_id ON developers(company_id);
"#;
