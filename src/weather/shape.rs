//! Reshaping of raw OpenWeatherMap responses into compact payloads.

use serde_json::{json, Value};

use super::units::{air_quality_label, format_temperature, format_wind_speed, wind_direction, Units};

const ALERTS_SUBSCRIPTION_NOTE: &str = "Weather alerts require OpenWeatherMap One Call API 3.0 \
    subscription. Visit https://openweathermap.org/api/one-call-3 for more information.";

/// Interpret `"lat,lon"` as coordinates when both parse and lie in range.
///
/// Anything else (e.g. `"New York,US"`) is left for geocoding.
#[must_use]
pub fn parse_coordinates(location: &str) -> Option<(f64, f64)> {
    let mut parts = location.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lon = parts.next()?.trim().parse::<f64>().ok()?;
    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then_some((lat, lon))
}

fn number(data: &Value, pointer: &str) -> f64 {
    data.pointer(pointer).and_then(Value::as_f64).unwrap_or(0.0)
}

fn text<'a>(data: &'a Value, pointer: &str) -> &'a str {
    data.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}

fn raw(data: &Value, pointer: &str) -> Value {
    data.pointer(pointer).cloned().unwrap_or_else(|| json!(0))
}

fn temperatures(data: &Value, units: Units) -> Value {
    json!({
        "current": format_temperature(number(data, "/main/temp"), units),
        "feels_like": format_temperature(number(data, "/main/feels_like"), units),
        "min": format_temperature(number(data, "/main/temp_min"), units),
        "max": format_temperature(number(data, "/main/temp_max"), units),
        "unit": units.temperature_label(),
    })
}

fn condition(data: &Value) -> Value {
    json!({
        "condition": text(data, "/weather/0/main"),
        "description": text(data, "/weather/0/description"),
        "icon": text(data, "/weather/0/icon"),
    })
}

/// Current conditions for one resolved location.
#[must_use]
pub fn current_weather(data: &Value, fallback_name: &str, lat: f64, lon: f64, units: Units) -> Value {
    let degrees = number(data, "/wind/deg");
    json!({
        "location": {
            "name": data.get("name").and_then(Value::as_str).unwrap_or(fallback_name),
            "country": text(data, "/sys/country"),
            "coordinates": { "lat": lat, "lon": lon },
        },
        "weather": condition(data),
        "temperature": temperatures(data, units),
        "humidity": raw(data, "/main/humidity"),
        "pressure": raw(data, "/main/pressure"),
        "visibility": raw(data, "/visibility"),
        "wind": {
            "speed": format_wind_speed(number(data, "/wind/speed"), units),
            "direction": wind_direction(degrees),
            "degrees": raw(data, "/wind/deg"),
            "unit": units.wind_label(),
        },
        "clouds": raw(data, "/clouds/all"),
        "sunrise": raw(data, "/sys/sunrise"),
        "sunset": raw(data, "/sys/sunset"),
        "timezone": raw(data, "/timezone"),
    })
}

/// Five-day forecast in three-hour steps.
#[must_use]
pub fn forecast(data: &Value, fallback_name: &str, lat: f64, lon: f64, units: Units) -> Value {
    let entries: Vec<Value> = data
        .get("list")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    json!({
                        "datetime": text(item, "/dt_txt"),
                        "timestamp": raw(item, "/dt"),
                        "weather": condition(item),
                        "temperature": temperatures(item, units),
                        "humidity": raw(item, "/main/humidity"),
                        "pressure": raw(item, "/main/pressure"),
                        "wind": {
                            "speed": format_wind_speed(number(item, "/wind/speed"), units),
                            "direction": wind_direction(number(item, "/wind/deg")),
                            "unit": units.wind_label(),
                        },
                        "clouds": raw(item, "/clouds/all"),
                        "precipitation_probability": number(item, "/pop") * 100.0,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    json!({
        "location": {
            "name": data.pointer("/city/name").and_then(Value::as_str).unwrap_or(fallback_name),
            "country": text(data, "/city/country"),
            "coordinates": { "lat": lat, "lon": lon },
        },
        "forecast_count": entries.len(),
        "forecasts": entries,
    })
}

/// Air quality index and pollutant concentrations.
#[must_use]
pub fn air_quality(data: &Value, lat: f64, lon: f64) -> Value {
    let reading = data.pointer("/list/0").cloned().unwrap_or_else(|| json!({}));
    let aqi = reading.pointer("/main/aqi").and_then(Value::as_i64).unwrap_or(0);
    let components: serde_json::Map<String, Value> = ["co", "no", "no2", "o3", "so2", "pm2_5", "pm10", "nh3"]
        .into_iter()
        .map(|name| (name.to_owned(), raw(&reading, &format!("/components/{name}"))))
        .collect();

    json!({
        "coordinates": { "lat": lat, "lon": lon },
        "air_quality_index": aqi,
        "air_quality_description": air_quality_label(aqi),
        "components": components,
        "component_units": "μg/m³",
        "timestamp": raw(&reading, "/dt"),
    })
}

/// Geocoding matches.
#[must_use]
pub fn locations(data: &Value) -> Value {
    let matches: Vec<Value> = data
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    json!({
                        "name": text(item, "/name"),
                        "local_names": item.get("local_names").cloned().unwrap_or_else(|| json!({})),
                        "lat": raw(item, "/lat"),
                        "lon": raw(item, "/lon"),
                        "country": text(item, "/country"),
                        "state": text(item, "/state"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Value::Array(matches)
}

/// Active government alerts.
#[must_use]
pub fn alerts(data: &Value, lat: f64, lon: f64) -> Value {
    let alerts: Vec<Value> = data
        .get("alerts")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|alert| {
                    json!({
                        "sender": text(alert, "/sender_name"),
                        "event": text(alert, "/event"),
                        "start": raw(alert, "/start"),
                        "end": raw(alert, "/end"),
                        "description": text(alert, "/description"),
                        "tags": alert.get("tags").cloned().unwrap_or_else(|| json!([])),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    json!({
        "coordinates": { "lat": lat, "lon": lon },
        "alert_count": alerts.len(),
        "alerts": alerts,
    })
}

/// Empty alert list returned when the key lacks a One Call subscription.
#[must_use]
pub fn alerts_unavailable(lat: f64, lon: f64) -> Value {
    json!({
        "coordinates": { "lat": lat, "lon": lon },
        "alert_count": 0,
        "alerts": [],
        "note": ALERTS_SUBSCRIPTION_NOTE,
    })
}

/// Condensed conditions used by the multi-location report.
#[must_use]
pub fn location_summary(data: &Value, fallback_name: &str, lat: f64, lon: f64, units: Units) -> Value {
    json!({
        "location": {
            "name": data.get("name").and_then(Value::as_str).unwrap_or(fallback_name),
            "country": text(data, "/sys/country"),
            "coordinates": { "lat": lat, "lon": lon },
        },
        "weather": {
            "condition": text(data, "/weather/0/main"),
            "description": text(data, "/weather/0/description"),
        },
        "temperature": {
            "current": format_temperature(number(data, "/main/temp"), units),
            "feels_like": format_temperature(number(data, "/main/feels_like"), units),
            "unit": units.temperature_label(),
        },
        "humidity": raw(data, "/main/humidity"),
        "wind": {
            "speed": format_wind_speed(number(data, "/wind/speed"), units),
            "unit": units.wind_label(),
        },
    })
}

/// Failure entry for a location that could not be resolved or fetched.
#[must_use]
pub fn location_failure(location: &str, message: &str) -> Value {
    json!({
        "location": { "name": location },
        "error": message,
    })
}
