//! Alpha Vantage HTTP client.

use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::errors::{ToolError, ToolResult};
use crate::http::{self, HttpSession};
use crate::mcp::BoxFuture;

/// Query parameters for one upstream call (`function`, `symbol`, ...).
pub type Params = Vec<(&'static str, String)>;

/// Raw access to the single Alpha Vantage query endpoint.
pub trait StocksApi: Send + Sync {
    /// GET the query endpoint with `params`, returning the decoded body.
    fn query(&self, params: Params) -> BoxFuture<'_, ToolResult<Value>>;

    /// Release the HTTP session.
    fn close(&self) -> BoxFuture<'_, ()>;
}

/// Live client keyed by `apikey`.
pub struct AlphaVantageClient {
    config: ApiConfig,
    session: HttpSession,
}

impl AlphaVantageClient {
    /// Create a client; no connection is opened until the first call.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            session: HttpSession::new("alphavantage"),
        }
    }

    async fn request(&self, mut params: Params) -> ToolResult<Value> {
        let client = self.session.client().await?;
        debug!(function = params.first().map(|(_, v)| v.as_str()), "alpha vantage request");

        params.push(("apikey", self.config.api_key.clone()));
        let response = client.get(&self.config.base_url).query(&params).send().await?;
        let (status, body) = http::read_body(response).await?;
        if !status.is_success() {
            return Err(http::status_error(status, format!("HTTP Error: {}", status.as_u16())));
        }
        check_body(body)
    }
}

/// Alpha Vantage reports failures inside 200 responses.
///
/// # Errors
///
/// `Error Message` maps to `InvalidRequest`; `Note` and `Information`
/// (quota and premium-endpoint notices) map to `RateLimited`.
pub fn check_body(body: Value) -> ToolResult<Value> {
    if let Some(message) = body.get("Error Message").and_then(Value::as_str) {
        return Err(ToolError::invalid(format!("API Error: {message}")));
    }
    if body.get("Note").is_some() {
        return Err(ToolError::rate_limited(
            "API rate limit exceeded. Please try again later.",
        ));
    }
    if let Some(message) = body.get("Information").and_then(Value::as_str) {
        return Err(ToolError::rate_limited(message.to_owned()));
    }
    Ok(body)
}

impl StocksApi for AlphaVantageClient {
    fn query(&self, params: Params) -> BoxFuture<'_, ToolResult<Value>> {
        Box::pin(self.request(params))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.session.close())
    }
}
