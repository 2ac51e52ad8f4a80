//! Weather tool catalog and request decoding.

use rmcp::model::Tool;
use serde::Deserialize;
use serde_json::json;

use super::units::Units;
use crate::errors::{ToolError, ToolResult};
use crate::mcp::catalog::tool;
use crate::mcp::ToolRequest;

const LOCATION_HELP: &str =
    "City name (e.g., 'London', 'New York,US', 'Paris,FR') or coordinates as 'lat,lon'";

const MAX_LOCATION_MATCHES: i64 = 5;

fn units_schema() -> serde_json::Value {
    json!({
        "type": "string",
        "description": "Temperature units: 'metric' (Celsius) or 'imperial' (Fahrenheit)",
        "enum": ["metric", "imperial"],
        "default": "metric"
    })
}

fn coordinates_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "lat": { "type": "number", "description": "Latitude of the location" },
            "lon": { "type": "number", "description": "Longitude of the location" }
        },
        "required": ["lat", "lon"]
    })
}

/// Static weather catalog.
#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            "get_current_weather",
            "Get current weather conditions for a location",
            json!({
                "type": "object",
                "properties": {
                    "location": { "type": "string", "description": LOCATION_HELP },
                    "units": units_schema()
                },
                "required": ["location"]
            }),
        ),
        tool(
            "get_forecast",
            "Get 5-day weather forecast with 3-hour intervals",
            json!({
                "type": "object",
                "properties": {
                    "location": { "type": "string", "description": LOCATION_HELP },
                    "units": units_schema()
                },
                "required": ["location"]
            }),
        ),
        tool(
            "get_air_quality",
            "Get air quality index and pollutant data for coordinates",
            coordinates_schema(),
        ),
        tool(
            "search_locations",
            "Search for locations by name to get coordinates",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "City name or location to search for" },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return (1-5)",
                        "default": 5,
                        "minimum": 1,
                        "maximum": 5
                    }
                },
                "required": ["query"]
            }),
        ),
        tool(
            "get_weather_alerts",
            "Get active weather alerts for coordinates (requires One Call API 3.0)",
            coordinates_schema(),
        ),
        tool(
            "get_multi_location_weather",
            "Get current weather for multiple locations at once",
            json!({
                "type": "object",
                "properties": {
                    "locations": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of city names or coordinates"
                    },
                    "units": units_schema()
                },
                "required": ["locations"]
            }),
        ),
    ]
}

/// Arguments naming a single location.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LocationArgs {
    /// City name or `"lat,lon"`.
    pub location: String,
    /// Requested measurement system.
    #[serde(default)]
    pub units: Units,
}

/// Explicit coordinates.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct CoordinateArgs {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

/// Geocoding search.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SearchArgs {
    /// Free-text place name.
    pub query: String,
    /// Match count, clamped to 1..=5.
    #[serde(default = "default_match_limit")]
    pub limit: i64,
}

fn default_match_limit() -> i64 {
    MAX_LOCATION_MATCHES
}

/// Several locations reported together.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MultiLocationArgs {
    /// City names or coordinates.
    pub locations: Vec<String>,
    /// Requested measurement system.
    #[serde(default)]
    pub units: Units,
}

/// Decoded weather invocation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum WeatherRequest {
    /// `get_current_weather`
    GetCurrentWeather(LocationArgs),
    /// `get_forecast`
    GetForecast(LocationArgs),
    /// `get_air_quality`
    GetAirQuality(CoordinateArgs),
    /// `search_locations`
    SearchLocations(SearchArgs),
    /// `get_weather_alerts`
    GetWeatherAlerts(CoordinateArgs),
    /// `get_multi_location_weather`
    GetMultiLocationWeather(MultiLocationArgs),
}

fn require_location(location: &str) -> ToolResult<()> {
    if location.trim().is_empty() {
        return Err(ToolError::invalid("Location is required"));
    }
    Ok(())
}

impl ToolRequest for WeatherRequest {
    fn normalize(self) -> ToolResult<Self> {
        match self {
            Self::GetCurrentWeather(ref args) | Self::GetForecast(ref args) => {
                require_location(&args.location)?;
                Ok(self)
            }
            Self::SearchLocations(mut args) => {
                if args.query.trim().is_empty() {
                    return Err(ToolError::invalid("Query is required"));
                }
                args.limit = args.limit.clamp(1, MAX_LOCATION_MATCHES);
                Ok(Self::SearchLocations(args))
            }
            Self::GetMultiLocationWeather(ref args) => {
                if args.locations.is_empty() {
                    return Err(ToolError::invalid("At least one location is required"));
                }
                Ok(self)
            }
            Self::GetAirQuality(_) | Self::GetWeatherAlerts(_) => Ok(self),
        }
    }
}
