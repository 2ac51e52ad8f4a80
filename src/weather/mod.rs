//! OpenWeatherMap adapter: current conditions, forecasts, air quality,
//! geocoding, alerts, and multi-location summaries.

pub mod provider;
pub mod shape;
pub mod tools;
pub mod units;

use std::sync::Arc;

use rmcp::model::Tool;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::{ErrorKind, ToolError, ToolResult};
use crate::mcp::{BoxFuture, Payload, ToolSet};

use self::provider::WeatherApi;
use self::tools::{CoordinateArgs, LocationArgs, MultiLocationArgs, SearchArgs, WeatherRequest};
use self::units::Units;

/// Server name announced to the host.
pub const SERVER_NAME: &str = "weather-data";

const INSTRUCTIONS: &str = "Weather data from OpenWeatherMap. Locations accept city names \
    ('London', 'Paris,FR') or 'lat,lon' coordinates; units are metric or imperial.";

/// A location resolved to coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Name to report when the upstream omits one.
    pub name: String,
}

/// Weather tool set over any [`WeatherApi`].
pub struct WeatherTools {
    api: Arc<dyn WeatherApi>,
}

impl WeatherTools {
    /// Create the tool set.
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api }
    }

    /// Resolve a location string, geocoding names that are not coordinates.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when geocoding yields no match.
    pub async fn resolve(&self, location: &str) -> ToolResult<ResolvedLocation> {
        if let Some((lat, lon)) = shape::parse_coordinates(location) {
            return Ok(ResolvedLocation {
                lat,
                lon,
                name: location.to_owned(),
            });
        }

        let matches = self
            .api
            .get("/geo/1.0/direct", vec![("q", location.to_owned()), ("limit", "1".into())])
            .await?;
        let first = matches
            .as_array()
            .and_then(|items| items.first())
            .ok_or_else(|| ToolError::not_found(format!("Location not found: {location}")))?;

        let coordinate = |key: &str| {
            first.get(key).and_then(Value::as_f64).ok_or_else(|| {
                ToolError::upstream(format!("geocoding result for {location} has no {key}"))
            })
        };
        Ok(ResolvedLocation {
            lat: coordinate("lat")?,
            lon: coordinate("lon")?,
            name: first
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(location)
                .to_owned(),
        })
    }

    async fn current(&self, args: LocationArgs) -> ToolResult<Value> {
        let place = self.resolve(&args.location).await?;
        let data = self.api.get("/data/2.5/weather", coordinate_params(&place)).await?;
        Ok(shape::current_weather(&data, &place.name, place.lat, place.lon, args.units))
    }

    async fn forecast(&self, args: LocationArgs) -> ToolResult<Value> {
        let place = self.resolve(&args.location).await?;
        let data = self.api.get("/data/2.5/forecast", coordinate_params(&place)).await?;
        Ok(shape::forecast(&data, &place.name, place.lat, place.lon, args.units))
    }

    async fn air_quality(&self, args: CoordinateArgs) -> ToolResult<Value> {
        let params = vec![("lat", args.lat.to_string()), ("lon", args.lon.to_string())];
        let data = self.api.get("/data/2.5/air_pollution", params).await?;
        Ok(shape::air_quality(&data, args.lat, args.lon))
    }

    async fn search(&self, args: SearchArgs) -> ToolResult<Value> {
        let params = vec![("q", args.query), ("limit", args.limit.to_string())];
        let data = self.api.get("/geo/1.0/direct", params).await?;
        Ok(shape::locations(&data))
    }

    async fn alerts(&self, args: CoordinateArgs) -> ToolResult<Value> {
        let params = vec![
            ("lat", args.lat.to_string()),
            ("lon", args.lon.to_string()),
            ("exclude", "minutely,hourly,daily".into()),
        ];
        match self.api.get("/data/3.0/onecall", params).await {
            Ok(data) => Ok(shape::alerts(&data, args.lat, args.lon)),
            Err(err) if err.kind == ErrorKind::AuthenticationFailure => {
                warn!(%err, "one call alerts unavailable for this key");
                Ok(shape::alerts_unavailable(args.lat, args.lon))
            }
            Err(err) => Err(err),
        }
    }

    async fn multi_location(&self, args: MultiLocationArgs) -> Value {
        let mut reports = Vec::with_capacity(args.locations.len());
        for location in &args.locations {
            match self.summary(location, args.units).await {
                Ok(report) => reports.push(report),
                Err(err) => {
                    warn!(location = %location, %err, "location lookup failed");
                    reports.push(shape::location_failure(location, &err.message));
                }
            }
        }
        info!(requested = args.locations.len(), "multi-location weather assembled");
        json!({
            "locations_count": args.locations.len(),
            "weather_data": reports,
        })
    }

    async fn summary(&self, location: &str, units: Units) -> ToolResult<Value> {
        let place = self.resolve(location).await?;
        let data = self.api.get("/data/2.5/weather", coordinate_params(&place)).await?;
        Ok(shape::location_summary(&data, &place.name, place.lat, place.lon, units))
    }

    async fn run(&self, request: WeatherRequest) -> ToolResult<Payload> {
        let body = match request {
            WeatherRequest::GetCurrentWeather(args) => self.current(args).await?,
            WeatherRequest::GetForecast(args) => self.forecast(args).await?,
            WeatherRequest::GetAirQuality(args) => self.air_quality(args).await?,
            WeatherRequest::SearchLocations(args) => self.search(args).await?,
            WeatherRequest::GetWeatherAlerts(args) => self.alerts(args).await?,
            WeatherRequest::GetMultiLocationWeather(args) => self.multi_location(args).await,
        };
        Ok(Payload::Json(body))
    }
}

fn coordinate_params(place: &ResolvedLocation) -> Vec<(&'static str, String)> {
    vec![("lat", place.lat.to_string()), ("lon", place.lon.to_string())]
}

impl ToolSet for WeatherTools {
    type Request = WeatherRequest;

    fn server_name(&self) -> &'static str {
        SERVER_NAME
    }

    fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    fn catalog(&self) -> Vec<Tool> {
        tools::catalog()
    }

    fn execute(&self, request: WeatherRequest) -> BoxFuture<'_, ToolResult<Payload>> {
        Box::pin(self.run(request))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        self.api.close()
    }
}
