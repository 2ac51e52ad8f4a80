//! NewsAPI HTTP client.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::errors::{ToolError, ToolResult};
use crate::http::{self, HttpSession};
use crate::mcp::BoxFuture;

/// Query parameters for one upstream call.
pub type Params = Vec<(&'static str, String)>;

/// Raw access to the NewsAPI v2 endpoints.
pub trait NewsApi: Send + Sync {
    /// GET `endpoint` (e.g. `top-headlines`) with `params`.
    fn get(&self, endpoint: &'static str, params: Params) -> BoxFuture<'_, ToolResult<Value>>;

    /// Release the HTTP session.
    fn close(&self) -> BoxFuture<'_, ()>;
}

/// Live client authenticating with the `X-Api-Key` header.
pub struct NewsApiClient {
    config: ApiConfig,
    session: HttpSession,
}

impl NewsApiClient {
    /// Create a client; no connection is opened until the first call.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            session: HttpSession::new("newsapi"),
        }
    }

    async fn request(&self, endpoint: &str, params: Params) -> ToolResult<Value> {
        let client = self.session.client().await?;
        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));
        debug!(%url, "newsapi request");

        let response = client
            .get(&url)
            .header("X-Api-Key", &self.config.api_key)
            .query(&params)
            .send()
            .await?;
        let (status, body) = http::read_body(response).await?;
        check_response(status, body)
    }
}

/// Validate a NewsAPI response, which may report errors with a 200 status.
///
/// # Errors
///
/// Returns the error kind matching the status or the body's `code`.
pub fn check_response(status: StatusCode, body: Value) -> ToolResult<Value> {
    let reported_error = body.get("status").and_then(Value::as_str) == Some("error");
    if status.is_success() && !reported_error {
        return Ok(body);
    }

    let message = http::body_message(&body, &format!("HTTP Error {}", status.as_u16()));
    let err = match status {
        StatusCode::UNAUTHORIZED => ToolError::auth("Invalid API key. Please check your NEWS_API_KEY."),
        StatusCode::UPGRADE_REQUIRED => {
            ToolError::invalid("Free tier limitation: This endpoint requires a paid plan.")
        }
        StatusCode::TOO_MANY_REQUESTS => {
            ToolError::rate_limited("API rate limit exceeded. Please try again later.")
        }
        StatusCode::OK => match body.get("code").and_then(Value::as_str) {
            Some("apiKeyInvalid" | "apiKeyMissing" | "apiKeyDisabled") => ToolError::auth(message),
            Some("rateLimited") => ToolError::rate_limited(message),
            Some("sourceDoesNotExist") => ToolError::not_found(message),
            Some("parametersMissing" | "parameterInvalid") => ToolError::invalid(message),
            _ => ToolError::upstream(format!("API Error: {message}")),
        },
        other => http::status_error(other, message),
    };
    Err(err)
}

impl NewsApi for NewsApiClient {
    fn get(&self, endpoint: &'static str, params: Params) -> BoxFuture<'_, ToolResult<Value>> {
        Box::pin(self.request(endpoint, params))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.session.close())
    }
}
