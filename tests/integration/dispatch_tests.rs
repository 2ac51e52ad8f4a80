//! Dispatcher behaviour shared by every adapter: validation before any
//! upstream traffic, error payload shape, and single-shot close.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use data_adapters::mcp::handler::AdapterServer;
use data_adapters::mcp::{Dispatcher, ToolSet};
use data_adapters::weather::WeatherTools;
use data_adapters::ToolError;
use rmcp::handler::server::ServerHandler;
use serde_json::json;

use super::test_helpers::{args, body, error_body, StubApi};

fn weather(api: &Arc<StubApi>) -> Dispatcher<WeatherTools> {
    Dispatcher::new(WeatherTools::new(api.clone()))
}

#[tokio::test]
async fn missing_argument_never_reaches_upstream() {
    let api = StubApi::new(|_, _| Ok(json!({})));
    let dispatcher = weather(&api);

    let result = dispatcher.call("get_air_quality", args(json!({ "lat": 51.5 }))).await;

    let body = error_body(&result);
    assert_eq!(body["kind"], json!("invalid_request"));
    assert_eq!(
        body["message"],
        json!("Missing required argument(s) for get_air_quality: lon")
    );
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn absent_arguments_are_treated_as_empty() {
    let api = StubApi::new(|_, _| Ok(json!({})));
    let dispatcher = weather(&api);

    let result = dispatcher.call("get_current_weather", None).await;

    let body = error_body(&result);
    assert!(body["message"].as_str().unwrap().contains("location"));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn unknown_tool_yields_error_payload() {
    let api = StubApi::new(|_, _| Ok(json!({})));
    let result = weather(&api).call("get_tides", args(json!({}))).await;

    let body = error_body(&result);
    assert_eq!(body["kind"], json!("invalid_request"));
    assert_eq!(body["message"], json!("Unknown tool: get_tides"));
    assert!(body.get("hint").is_none());
}

#[tokio::test]
async fn upstream_failure_becomes_error_payload() {
    let api = StubApi::new(|_, _| Err(ToolError::rate_limited("API rate limit exceeded.")));
    let result = weather(&api)
        .call("get_air_quality", args(json!({ "lat": 1.0, "lon": 2.0 })))
        .await;

    let body = error_body(&result);
    assert_eq!(body["kind"], json!("rate_limited"));
    assert_eq!(body["message"], json!("API rate limit exceeded."));
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn successful_call_is_not_flagged() {
    let api = StubApi::new(|_, _| Ok(json!({ "list": [{ "main": { "aqi": 2 }, "dt": 1 }] })));
    let result = weather(&api)
        .call("get_air_quality", args(json!({ "lat": 1.0, "lon": 2.0 })))
        .await;

    assert_ne!(result.is_error, Some(true));
    assert_eq!(body(&result)["air_quality_index"], json!(2));
}

#[tokio::test]
async fn close_runs_once() {
    let api = StubApi::new(|_, _| Ok(json!({})));
    let dispatcher = weather(&api);
    assert!(!dispatcher.is_closed());

    dispatcher.close().await;
    dispatcher.close().await;

    assert!(dispatcher.is_closed());
    assert_eq!(api.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_info_announces_tools_and_instructions() {
    let api = StubApi::new(|_, _| Ok(json!({})));
    let server = AdapterServer::new(Arc::new(weather(&api)));

    let info = server.get_info();

    assert!(info.capabilities.tools.is_some());
    assert_eq!(info.server_info.name, "weather-data");
    assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(
        info.instructions.as_deref(),
        Some(server.dispatcher().tools().instructions())
    );
}
