//! Migration runner and text-table status reporter.
//!
//! `migrate run` applies pending units; `migrate status` prints the ledger
//! without touching the schema.

use anyhow::Context;
use clap::{Parser, Subcommand};

use perftrack_api::config::AppConfig;
use perftrack_api::database::{self, migrations};

#[derive(Parser)]
#[command(name = "migrate", about = "Aplica e inspeciona as migrações do banco de dados")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Aplica as migrações pendentes")]
    Run,
    #[command(about = "Mostra o status de cada migração conhecida")]
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let pool = database::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    match cli.command {
        Commands::Run => {
            let applied = migrations::run(&pool).await.context("migration run failed")?;
            if applied == 0 {
                println!("Nenhuma migração pendente encontrada");
            } else {
                println!("{applied} migração(ões) aplicada(s) com sucesso");
            }
        }
        Commands::Status => {
            let entries = migrations::status(&pool).await.context("failed to read ledger")?;
            print_status_table(&entries);
        }
    }

    Ok(())
}

fn print_status_table(entries: &[migrations::MigrationStatus]) {
    let id_width = entries.iter().map(|e| e.id.len()).max().unwrap_or(0).max("ID".len());
    let desc_width =
        entries.iter().map(|e| e.description.chars().count()).max().unwrap_or(0).max("Descrição".len());

    println!("{:<id_width$}   {:<desc_width$}   {:<8}   Data", "ID", "Descrição", "Status");
    println!("{}   {}   {}   {}", "-".repeat(id_width), "-".repeat(desc_width), "-".repeat(8), "-".repeat(19));

    let mut applied_count = 0;
    let mut pending_count = 0;

    for entry in entries {
        let (status, date) = match entry.applied_at {
            Some(at) => {
                applied_count += 1;
                ("aplicada", at.format("%Y-%m-%d %H:%M:%S").to_string())
            }
            None => {
                pending_count += 1;
                ("pendente", "-".to_string())
            }
        };
        println!("{:<id_width$}   {:<desc_width$}   {:<8}   {}", entry.id, entry.description, status, date);
    }

    println!();
    println!("Resumo: {} conhecida(s), {} aplicada(s), {} pendente(s)", entries.len(), applied_count, pending_count);
    if pending_count > 0 {
        println!("Existem migrações pendentes. Execute `migrate run` ou inicie a API para aplicá-las.");
    }
}
