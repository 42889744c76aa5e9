use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use webdriver_dispatch::commands::standard_handlers;
use webdriver_dispatch::platform::testing::{FakeDocument, FakeWindow};
use webdriver_dispatch::webdriver::ELEMENT_KEY;
use webdriver_dispatch::{server, Driver, DriverConfig, ServerHandle};

struct Harness {
    driver: Driver,
    server: ServerHandle,
    window: FakeWindow,
    base_url: String,
    client: Client,
}

async fn spawn_driver() -> Result<Harness> {
    let driver = Driver::spawn(&DriverConfig::default(), standard_handlers())?;
    let window = FakeWindow::new(
        FakeDocument::new()
            .with_element("#button", "button")
            .with_frame("first", FakeDocument::new().with_element("#inner", "p"))
            .with_frame("second", FakeDocument::new()),
    );
    driver.open_window(window.boxed()).await?;

    let server = server::start(driver.clone(), SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let base_url = format!("http://{}", server.addr());
    Ok(Harness {
        driver,
        server,
        window,
        base_url,
        client: Client::new(),
    })
}

async fn create_session(harness: &Harness) -> Result<String> {
    let response: Value = harness
        .client
        .post(format!("{}/session", harness.base_url))
        .json(&json!({"capabilities": {}}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("parse create session response")?;
    response["value"]["sessionId"]
        .as_str()
        .context("session id missing")
        .map(str::to_string)
}

async fn post(harness: &Harness, path: &str, body: Value) -> Result<(StatusCode, Value)> {
    let response = harness
        .client
        .post(format!("{}{}", harness.base_url, path))
        .json(&body)
        .send()
        .await?;
    let status = response.status();
    Ok((status, response.json().await.context("parse response")?))
}

async fn get(harness: &Harness, path: &str) -> Result<(StatusCode, Value)> {
    let response = harness
        .client
        .get(format!("{}{}", harness.base_url, path))
        .send()
        .await?;
    let status = response.status();
    Ok((status, response.json().await.context("parse response")?))
}

#[tokio::test]
async fn test_status() -> Result<()> {
    let harness = spawn_driver().await?;
    let (status, body) = get(&harness, "/status").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["ready"], true);
    harness.server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_switch_to_frame_over_http() -> Result<()> {
    let harness = spawn_driver().await?;
    let session_id = create_session(&harness).await?;
    let frame_path = format!("/session/{session_id}/frame");

    let (status, body) = post(&harness, &frame_path, json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["value"]["error"], "invalid argument");

    let (status, body) = post(&harness, &frame_path, json!({"id": 5})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["value"]["error"], "no such frame");
    assert!(harness.window.focused_path().is_empty());

    let (status, body) = post(&harness, &frame_path, json!({"id": "first"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], Value::Null);
    assert_eq!(harness.window.focused_path(), vec!["first"]);

    let element_path = format!("/session/{session_id}/element");
    let (status, body) = post(
        &harness,
        &element_path,
        json!({"using": "css selector", "value": "#inner"}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["value"][ELEMENT_KEY].is_string());

    let (status, _) = post(&harness, &format!("{frame_path}/parent"), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(harness.window.focused_path().is_empty());

    harness.server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_element_reference_frame_switch() -> Result<()> {
    let harness = spawn_driver().await?;
    let session_id = create_session(&harness).await?;

    let (_, body) = post(
        &harness,
        &format!("/session/{session_id}/element"),
        json!({"using": "css selector", "value": "#second"}),
    )
    .await?;
    let reference = body["value"].clone();

    let (status, _) = post(
        &harness,
        &format!("/session/{session_id}/frame"),
        json!({ "id": reference }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(harness.window.focused_path(), vec!["second"]);

    // The reference belonged to the document that is no longer focused
    let (status, body) = post(
        &harness,
        &format!("/session/{session_id}/frame"),
        json!({ "id": reference }),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["value"]["error"], "stale element reference");

    harness.server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_session_lifecycle() -> Result<()> {
    let harness = spawn_driver().await?;

    let (status, body) = get(&harness, "/session/not-a-session/window").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["value"]["error"], "invalid session id");

    let session_id = create_session(&harness).await?;
    let (status, body) = post(&harness, "/session", json!({"capabilities": {}})).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["value"]["error"], "session not created");

    let (status, body) = get(&harness, &format!("/session/{session_id}/window")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["value"].as_str(),
        harness.driver.session().current_window_id().as_deref()
    );

    let response = harness
        .client
        .delete(format!("{}/session/{session_id}", harness.base_url))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = get(&harness, &format!("/session/{session_id}/window")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    harness.server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_timeouts_and_navigation() -> Result<()> {
    let harness = spawn_driver().await?;
    let session_id = create_session(&harness).await?;

    let (status, _) = post(
        &harness,
        &format!("/session/{session_id}/timeouts"),
        json!({"implicit": 100}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&harness, &format!("/session/{session_id}/timeouts")).await?;
    assert_eq!(body["value"]["implicit"], 100);

    let (status, _) = post(
        &harness,
        &format!("/session/{session_id}/url"),
        json!({"url": "https://example.test/"}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&harness, &format!("/session/{session_id}/url")).await?;
    assert_eq!(body["value"], "https://example.test/");

    harness.server.shutdown().await;
    Ok(())
}
