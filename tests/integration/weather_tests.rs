use std::sync::Arc;

use data_adapters::mcp::Dispatcher;
use data_adapters::weather::WeatherTools;
use data_adapters::ToolError;
use serde_json::{json, Value};

use super::test_helpers::{args, body, error_body, param, Params, StubApi};

fn dispatcher(api: &Arc<StubApi>) -> Dispatcher<WeatherTools> {
    Dispatcher::new(WeatherTools::new(api.clone()))
}

fn geocode(params: &Params) -> Value {
    match param(params, "q") {
        Some("London") => json!([{ "name": "London", "lat": 51.5073, "lon": -0.1276, "country": "GB" }]),
        Some("Paris") => json!([{ "name": "Paris", "lat": 48.8566, "lon": 2.3522, "country": "FR" }]),
        _ => json!([]),
    }
}

fn conditions(params: &Params) -> Value {
    let name = if param(params, "lat") == Some("51.5073") { "London" } else { "Paris" };
    json!({
        "name": name,
        "sys": { "country": "XX", "sunrise": 1, "sunset": 2 },
        "weather": [{ "main": "Clouds", "description": "overcast clouds", "icon": "04d" }],
        "main": { "temp": 293.15, "feels_like": 293.15, "temp_min": 293.15, "temp_max": 293.15, "humidity": 60, "pressure": 1012 },
        "wind": { "speed": 4.0, "deg": 90 },
        "clouds": { "all": 90 },
        "visibility": 10000,
        "timezone": 0
    })
}

fn world(endpoint: &str, params: &Params) -> Result<Value, ToolError> {
    match endpoint {
        "/geo/1.0/direct" => Ok(geocode(params)),
        "/data/2.5/weather" => Ok(conditions(params)),
        other => Err(ToolError::upstream(format!("unexpected endpoint {other}"))),
    }
}

#[tokio::test]
async fn current_weather_geocodes_names() {
    let api = StubApi::new(world);
    let result = dispatcher(&api)
        .call("get_current_weather", args(json!({ "location": "London" })))
        .await;

    let body = body(&result);
    assert_eq!(body["location"]["name"], json!("London"));
    assert_eq!(body["location"]["coordinates"]["lat"], json!(51.5073));
    assert_eq!(body["temperature"]["current"], json!(20.0));
    assert_eq!(body["temperature"]["unit"], json!("°C"));
    assert_eq!(body["wind"]["direction"], json!("E"));
    assert_eq!(api.endpoints(), ["/geo/1.0/direct", "/data/2.5/weather"]);
}

#[tokio::test]
async fn coordinates_skip_geocoding() {
    let api = StubApi::new(world);
    let result = dispatcher(&api)
        .call(
            "get_current_weather",
            args(json!({ "location": "51.5073,-0.1276", "units": "imperial" })),
        )
        .await;

    let body = body(&result);
    assert_eq!(body["temperature"]["current"], json!(68.0));
    assert_eq!(body["temperature"]["unit"], json!("°F"));
    assert_eq!(api.endpoints(), ["/data/2.5/weather"]);
}

#[tokio::test]
async fn unknown_location_is_not_found() {
    let api = StubApi::new(world);
    let result = dispatcher(&api)
        .call("get_forecast", args(json!({ "location": "Atlantis" })))
        .await;

    let body = error_body(&result);
    assert_eq!(body["kind"], json!("not_found"));
    assert_eq!(body["message"], json!("Location not found: Atlantis"));
}

#[tokio::test]
async fn multi_location_isolates_failures() {
    let api = StubApi::new(world);
    let result = dispatcher(&api)
        .call(
            "get_multi_location_weather",
            args(json!({ "locations": ["London", "Atlantis", "Paris"] })),
        )
        .await;

    assert_ne!(result.is_error, Some(true));
    let body = body(&result);
    assert_eq!(body["locations_count"], json!(3));
    let reports = body["weather_data"].as_array().unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["location"]["name"], json!("London"));
    assert_eq!(reports[1]["location"]["name"], json!("Atlantis"));
    assert_eq!(reports[1]["error"], json!("Location not found: Atlantis"));
    assert_eq!(reports[2]["location"]["name"], json!("Paris"));
    assert_eq!(reports[2]["weather"]["condition"], json!("Clouds"));
}

#[tokio::test]
async fn alerts_degrade_without_subscription() {
    let api = StubApi::new(|_, _| Err(ToolError::auth("Invalid API key.")));
    let result = dispatcher(&api)
        .call("get_weather_alerts", args(json!({ "lat": 40.0, "lon": -74.0 })))
        .await;

    assert_ne!(result.is_error, Some(true));
    let body = body(&result);
    assert_eq!(body["alert_count"], json!(0));
    assert!(body["note"].as_str().unwrap().contains("One Call API 3.0"));
}

#[tokio::test]
async fn alerts_report_other_failures() {
    let api = StubApi::new(|_, _| Err(ToolError::unavailable("connection refused")));
    let result = dispatcher(&api)
        .call("get_weather_alerts", args(json!({ "lat": 40.0, "lon": -74.0 })))
        .await;

    assert_eq!(error_body(&result)["kind"], json!("unavailable"));
}

#[tokio::test]
async fn alerts_are_flattened() {
    let api = StubApi::new(|_, params| {
        assert_eq!(param(params, "exclude"), Some("minutely,hourly,daily"));
        Ok(json!({
            "alerts": [{
                "sender_name": "NWS",
                "event": "Heat Advisory",
                "start": 10,
                "end": 20,
                "description": "Hot.",
                "tags": ["Extreme temperature value"]
            }]
        }))
    });
    let result = dispatcher(&api)
        .call("get_weather_alerts", args(json!({ "lat": 40.0, "lon": -74.0 })))
        .await;

    let body = body(&result);
    assert_eq!(body["alert_count"], json!(1));
    assert_eq!(body["alerts"][0]["sender"], json!("NWS"));
    assert_eq!(body["alerts"][0]["event"], json!("Heat Advisory"));
}

#[tokio::test]
async fn search_passes_clamped_limit() {
    let api = StubApi::new(world);
    let result = dispatcher(&api)
        .call("search_locations", args(json!({ "query": "London", "limit": 9 })))
        .await;

    let body = body(&result);
    assert_eq!(body[0]["name"], json!("London"));
    assert_eq!(body[0]["country"], json!("GB"));
    let calls = api.calls.lock().unwrap();
    assert_eq!(param(&calls[0].1, "limit"), Some("5"));
}
