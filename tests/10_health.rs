mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn init_check_reports_initialization_state() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let res = client.get(common::api(server, "/init/check")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"]["initialized"].is_boolean());
    assert!(body["data"]["userCount"].is_number());
    Ok(())
}

#[tokio::test]
async fn protected_route_requires_bearer_token() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    // no Authorization header
    let res = client.get(common::api(server, "/developers")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true);

    // malformed prefix
    let res = client
        .get(common::api(server, "/developers"))
        .header("Authorization", "Token abc")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // garbage token
    let res = client
        .get(common::api(server, "/developers"))
        .header("Authorization", "Bearer nonsense")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
