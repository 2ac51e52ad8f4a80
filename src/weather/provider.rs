//! OpenWeatherMap HTTP client.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::errors::{ToolError, ToolResult};
use crate::http::{self, HttpSession};
use crate::mcp::BoxFuture;

/// Query parameters for one upstream call.
pub type Params = Vec<(&'static str, String)>;

/// Raw access to the OpenWeatherMap REST API.
pub trait WeatherApi: Send + Sync {
    /// GET `endpoint` with `params`, returning the decoded JSON body.
    fn get(&self, endpoint: &'static str, params: Params) -> BoxFuture<'_, ToolResult<Value>>;

    /// Release the HTTP session.
    fn close(&self) -> BoxFuture<'_, ()>;
}

/// Live client keyed by `appid`.
pub struct OpenWeatherClient {
    config: ApiConfig,
    session: HttpSession,
}

impl OpenWeatherClient {
    /// Create a client; no connection is opened until the first call.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            session: HttpSession::new("openweathermap"),
        }
    }

    async fn request(&self, endpoint: &str, mut params: Params) -> ToolResult<Value> {
        let client = self.session.client().await?;
        let url = format!("{}{endpoint}", self.config.base_url.trim_end_matches('/'));
        debug!(%url, "openweathermap request");

        params.push(("appid", self.config.api_key.clone()));
        let response = client.get(&url).query(&params).send().await?;
        let (status, body) = http::read_body(response).await?;
        if status.is_success() {
            return Ok(body);
        }
        Err(map_status(status, &body))
    }
}

fn map_status(status: StatusCode, body: &Value) -> ToolError {
    match status {
        StatusCode::UNAUTHORIZED => {
            ToolError::auth("Invalid API key. Please check your OPENWEATHER_API_KEY.")
        }
        StatusCode::NOT_FOUND => ToolError::not_found(
            "Location not found. Please check the location name or coordinates.",
        ),
        StatusCode::TOO_MANY_REQUESTS => {
            ToolError::rate_limited("API rate limit exceeded. Please try again later.")
        }
        other => http::status_error(
            other,
            format!("HTTP Error {}: {}", other.as_u16(), http::body_message(body, "no details")),
        ),
    }
}

impl WeatherApi for OpenWeatherClient {
    fn get(&self, endpoint: &'static str, params: Params) -> BoxFuture<'_, ToolResult<Value>> {
        Box::pin(self.request(endpoint, params))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.session.close())
    }
}
