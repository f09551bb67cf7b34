//! Shared harness for the end-to-end tests.
//!
//! These tests drive a real server process against a real Postgres, so
//! they only run when opted in: set `PERFTRACK_IT=1` and point the DB_*
//! variables at a FRESH, disposable database. Without the opt-in every
//! test skips and passes.

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

static SERVER: OnceLock<Option<TestServer>> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/perftrack-api");
        cmd.env("PORT", port.to_string())
            .env("HOST", "127.0.0.1")
            .env("INSTALL_KEY", install_key())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit the environment so the server sees the DB_* variables
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub fn install_key() -> String {
    std::env::var("INSTALL_KEY").unwrap_or_else(|_| "PERFTRACK_IT_KEY".to_string())
}

/// Returns `None` (skip) unless the integration environment is opted in.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    if std::env::var("PERFTRACK_IT").is_err() {
        eprintln!("skipping integration test: PERFTRACK_IT not set");
        return Ok(None);
    }
    let server = SERVER
        .get_or_init(|| TestServer::spawn().ok())
        .as_ref()
        .context("failed to spawn server binary")?;
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(Some(server))
}

pub fn api(server: &TestServer, path: &str) -> String {
    format!("{}/api/v1{}", server.base_url, path)
}
