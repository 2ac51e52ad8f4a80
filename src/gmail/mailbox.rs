//! Gmail REST client.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use super::auth::{self, AccessToken, ClientSecrets, StoredToken};
use crate::config::GmailConfig;
use crate::errors::{ToolError, ToolResult};
use crate::http::{self, HttpSession};
use crate::mcp::BoxFuture;

/// Detail level for a message fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Headers `From`, `Subject`, `Date` plus snippet.
    Metadata,
    /// Full message resource.
    Full,
}

/// Label edit applied by a modify call.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LabelChange {
    /// Labels to add.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_label_ids: Vec<&'static str>,
    /// Labels to remove.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_label_ids: Vec<&'static str>,
}

impl LabelChange {
    /// Add one label.
    #[must_use]
    pub fn add(label: &'static str) -> Self {
        Self {
            add_label_ids: vec![label],
            remove_label_ids: Vec::new(),
        }
    }

    /// Remove one label.
    #[must_use]
    pub fn remove(label: &'static str) -> Self {
        Self {
            add_label_ids: Vec::new(),
            remove_label_ids: vec![label],
        }
    }
}

/// Operations the Gmail adapter needs from a mailbox.
pub trait Mailbox: Send + Sync {
    /// Ids of messages matching a Gmail search query.
    fn list_message_ids<'a>(
        &'a self,
        query: &'a str,
        max_results: Option<i64>,
    ) -> BoxFuture<'a, ToolResult<Vec<String>>>;

    /// Fetch one message resource.
    fn get_message<'a>(&'a self, id: &'a str, format: MessageFormat) -> BoxFuture<'a, ToolResult<Value>>;

    /// Permanently delete one message.
    fn delete_message<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ToolResult<()>>;

    /// Add or remove labels on one message.
    fn modify_labels<'a>(&'a self, id: &'a str, change: LabelChange) -> BoxFuture<'a, ToolResult<()>>;

    /// Release the HTTP session and cached token.
    fn close(&self) -> BoxFuture<'_, ()>;
}

/// Live Gmail client for the authorized user (`users/me`).
pub struct GmailClient {
    config: GmailConfig,
    session: HttpSession,
    token: Mutex<Option<AccessToken>>,
}

impl GmailClient {
    /// Create a client; credentials are read on first use.
    #[must_use]
    pub fn new(config: GmailConfig) -> Self {
        Self {
            config,
            session: HttpSession::new("gmail"),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> ToolResult<String> {
        let mut cached = self.token.lock().await;
        let now = chrono::Utc::now();
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let mut stored = StoredToken::load(&self.config.token_path).await?;
        if let Some(token) = stored.access_token().filter(|token| token.is_fresh(now)) {
            let value = token.value.clone();
            *cached = Some(token);
            return Ok(value);
        }

        let refresh_token = stored.refresh_token().map(str::to_owned).ok_or_else(|| {
            ToolError::auth("token.json has no refresh token")
                .with_hint("Delete token.json and complete the OAuth consent flow again.")
        })?;
        let secrets = match stored.client() {
            Some(secrets) => secrets,
            None => ClientSecrets::load(&self.config.client_secrets_path).await?,
        };

        let client = self.session.client().await?;
        let token = auth::refresh(&client, &secrets, &refresh_token).await?;
        stored.store(&self.config.token_path, &token).await;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn send(&self, method: Method, path: &str, build: impl FnOnce(RequestBuilder) -> RequestBuilder) -> ToolResult<Value> {
        let token = self.access_token().await?;
        let client = self.session.client().await?;
        let url = format!("{}/users/me/{path}", self.config.base_url.trim_end_matches('/'));
        debug!(%method, %url, "gmail request");

        let response = build(client.request(method, &url).bearer_auth(token)).send().await?;
        let (status, body) = http::read_body(response).await?;
        if status.is_success() {
            return Ok(body);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.token.lock().await.take();
        }
        Err(map_status(status, &body))
    }

    async fn list(&self, query: &str, max_results: Option<i64>) -> ToolResult<Vec<String>> {
        let mut params = vec![("q", query.to_owned())];
        if let Some(max) = max_results {
            params.push(("maxResults", max.to_string()));
        }
        let body = self.send(Method::GET, "messages", |req| req.query(&params)).await?;
        Ok(body
            .get("messages")
            .and_then(Value::as_array)
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|message| message.get("id").and_then(Value::as_str))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, id: &str, format: MessageFormat) -> ToolResult<Value> {
        let params: Vec<(&str, &str)> = match format {
            MessageFormat::Metadata => vec![
                ("format", "metadata"),
                ("metadataHeaders", "From"),
                ("metadataHeaders", "Subject"),
                ("metadataHeaders", "Date"),
            ],
            MessageFormat::Full => vec![("format", "full")],
        };
        self.send(Method::GET, &message_path(id, "")?, |req| req.query(&params))
            .await
    }

    async fn delete(&self, id: &str) -> ToolResult<()> {
        self.send(Method::DELETE, &message_path(id, "")?, |req| req)
            .await
            .map(drop)
    }

    async fn modify(&self, id: &str, change: LabelChange) -> ToolResult<()> {
        self.send(Method::POST, &message_path(id, "/modify")?, |req| req.json(&change))
            .await
            .map(drop)
    }
}

/// `messages/{id}{suffix}`, refusing ids that could leave the message
/// collection. Gmail ids are URL-safe base64 or hex.
fn message_path(id: &str, suffix: &str) -> ToolResult<String> {
    let url_safe = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if id.is_empty() || !url_safe {
        return Err(ToolError::invalid(format!("Invalid email id: {id:?}")));
    }
    Ok(format!("messages/{id}{suffix}"))
}

fn map_status(status: StatusCode, body: &Value) -> ToolError {
    let message = http::body_message(body, &format!("HTTP Error {}", status.as_u16()));
    let reason = body
        .pointer("/error/errors/0/reason")
        .and_then(Value::as_str)
        .unwrap_or_default();
    match (status, reason) {
        (StatusCode::FORBIDDEN, "rateLimitExceeded" | "userRateLimitExceeded") => {
            ToolError::rate_limited(message)
        }
        (StatusCode::FORBIDDEN, _) => ToolError::auth(message)
            .with_hint("The token lacks the gmail.modify scope; re-run the consent flow."),
        _ => http::status_error(status, message),
    }
}

impl Mailbox for GmailClient {
    fn list_message_ids<'a>(
        &'a self,
        query: &'a str,
        max_results: Option<i64>,
    ) -> BoxFuture<'a, ToolResult<Vec<String>>> {
        Box::pin(self.list(query, max_results))
    }

    fn get_message<'a>(&'a self, id: &'a str, format: MessageFormat) -> BoxFuture<'a, ToolResult<Value>> {
        Box::pin(self.get(id, format))
    }

    fn delete_message<'a>(&'a self, id: &'a str) -> BoxFuture<'a, ToolResult<()>> {
        Box::pin(self.delete(id))
    }

    fn modify_labels<'a>(&'a self, id: &'a str, change: LabelChange) -> BoxFuture<'a, ToolResult<()>> {
        Box::pin(self.modify(id, change))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.token.lock().await.take();
            self.session.close().await;
        })
    }
}

