//! Lazily opened HTTP session shared by the REST adapters.
//!
//! The client is created on first use and dropped by [`HttpSession::close`].
//! A request after close transparently opens a fresh client.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::{ToolError, ToolResult};

/// Default per-request timeout for upstream APIs.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("data-adapters/", env!("CARGO_PKG_VERSION"));

/// Lazily created `reqwest` client.
#[derive(Debug)]
pub struct HttpSession {
    name: &'static str,
    client: Mutex<Option<Client>>,
}

impl HttpSession {
    /// Create a closed session; nothing is opened until first use.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            client: Mutex::new(None),
        }
    }

    /// Return the open client, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the TLS backend cannot be initialized.
    pub async fn client(&self) -> ToolResult<Client> {
        let mut guard = self.client.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ToolError::unavailable(format!("failed to build HTTP client: {err}")))?;
        debug!(session = self.name, "http session opened");
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Drop the client. Safe to call repeatedly.
    pub async fn close(&self) {
        if self.client.lock().await.take().is_some() {
            info!(session = self.name, "http session closed");
        }
    }

    /// Whether a client is currently open.
    pub async fn is_open(&self) -> bool {
        self.client.lock().await.is_some()
    }
}

/// Read a response body as JSON regardless of status.
///
/// Bodies that are not JSON are returned as a JSON string so error messages
/// can still quote them.
///
/// # Errors
///
/// Returns `Unavailable` if the body cannot be read from the socket.
pub async fn read_body(response: Response) -> ToolResult<(StatusCode, Value)> {
    let status = response.status();
    let text = response.text().await?;
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok((status, body))
}

/// Default mapping from a non-success status to an error kind.
#[must_use]
pub fn status_error(status: StatusCode, message: impl Into<String>) -> ToolError {
    let message = message.into();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ToolError::auth(message),
        StatusCode::NOT_FOUND => ToolError::not_found(message),
        StatusCode::TOO_MANY_REQUESTS => ToolError::rate_limited(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ToolError::invalid(message),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            ToolError::unavailable(message)
        }
        _ => ToolError::upstream(message),
    }
}

/// Best-effort `message` extraction from an upstream error body.
#[must_use]
pub fn body_message(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/error/message").and_then(Value::as_str))
        .or_else(|| body.as_str().filter(|text| !text.trim().is_empty()))
        .map_or_else(|| fallback.to_owned(), str::to_owned)
}
