//! The migration run is idempotent: the server applied everything at
//! startup, so a second run through the CLI applies zero units.

mod common;

use anyhow::Result;
use std::process::Command;

#[tokio::test]
async fn rerun_applies_nothing() -> Result<()> {
    let Some(_server) = common::ensure_server().await? else { return Ok(()) };

    let output = Command::new("target/debug/migrate").arg("run").output()?;
    assert!(output.status.success(), "migrate run failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Nenhuma migração pendente"),
        "expected no pending migrations, got: {stdout}"
    );

    let output = Command::new("target/debug/migrate").arg("status").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 pendente(s)"), "ledger should be fully applied: {stdout}");
    Ok(())
}
