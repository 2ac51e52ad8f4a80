//! OAuth refresh-token handling for the Gmail API.
//!
//! Only the non-interactive half of the installed-app flow is supported:
//! `token.json` must already hold a refresh token. Access tokens are cached
//! in memory and written back to `token.json` after each refresh.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::errors::{ToolError, ToolResult};
use crate::http;

/// Google's default token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed early.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

const SETUP_HINT: &str = "Download an OAuth client (Desktop app) as credentials.json from the \
    Google Cloud console and complete the consent flow once to create token.json.";

const REAUTH_HINT: &str = "Delete token.json and complete the OAuth consent flow again.";

/// OAuth client identity.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientSecrets {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.into()
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Parse a cloud-console client secret file (`installed` or `web`).
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailure` with a setup hint if the file is
    /// missing or malformed.
    pub async fn load(path: &Path) -> ToolResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
            ToolError::auth(format!(
                "Setup required: cannot read {}: {err}",
                path.display()
            ))
            .with_hint(SETUP_HINT)
        })?;
        let file: ClientSecretsFile = serde_json::from_str(&raw).map_err(|err| {
            ToolError::auth(format!("invalid client secret file {}: {err}", path.display()))
                .with_hint(SETUP_HINT)
        })?;
        file.installed.or(file.web).ok_or_else(|| {
            ToolError::auth(format!(
                "{} has neither an 'installed' nor a 'web' client",
                path.display()
            ))
            .with_hint(SETUP_HINT)
        })
    }
}

/// Bearer token with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Token value.
    pub value: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token is still usable at `now`, leaving a safety margin.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(EXPIRY_MARGIN_SECONDS) > now
    }
}

/// Contents of an authorized-user `token.json`.
#[derive(Debug, Clone)]
pub struct StoredToken {
    fields: Map<String, Value>,
}

impl StoredToken {
    /// Read `token.json`.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailure` when the file is missing or not a
    /// JSON object.
    pub async fn load(path: &Path) -> ToolResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
            ToolError::auth(format!("Setup required: cannot read {}: {err}", path.display()))
                .with_hint(SETUP_HINT)
        })?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            _ => Err(ToolError::auth(format!("{} is not a valid token file", path.display()))
                .with_hint(REAUTH_HINT)),
        }
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Refresh token, if present.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.text("refresh_token")
    }

    /// Cached access token, if present with a parseable expiry.
    #[must_use]
    pub fn access_token(&self) -> Option<AccessToken> {
        let value = self.text("token")?;
        let expires_at = DateTime::parse_from_rfc3339(self.text("expiry")?).ok()?;
        Some(AccessToken {
            value: value.to_owned(),
            expires_at: expires_at.with_timezone(&Utc),
        })
    }

    /// Client identity embedded in the token file, if complete.
    #[must_use]
    pub fn client(&self) -> Option<ClientSecrets> {
        Some(ClientSecrets {
            client_id: self.text("client_id")?.to_owned(),
            client_secret: self.text("client_secret")?.to_owned(),
            token_uri: self.text("token_uri").unwrap_or(DEFAULT_TOKEN_URI).to_owned(),
        })
    }

    /// Record a refreshed access token and write the file back.
    pub async fn store(&mut self, path: &Path, token: &AccessToken) {
        self.fields.insert("token".into(), Value::String(token.value.clone()));
        self.fields.insert(
            "expiry".into(),
            Value::String(token.expires_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)),
        );
        let body = match serde_json::to_string_pretty(&self.fields) {
            Ok(body) => body,
            Err(err) => {
                warn!(%err, "failed to serialize refreshed token");
                return;
            }
        };
        if let Err(err) = tokio::fs::write(path, body).await {
            warn!(path = %path.display(), %err, "failed to persist refreshed token");
        }
    }
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Exchange a refresh token for a new access token.
///
/// # Errors
///
/// Returns `AuthenticationFailure` when Google rejects the grant, or the
/// mapped transport failure otherwise.
pub async fn refresh(client: &Client, secrets: &ClientSecrets, refresh_token: &str) -> ToolResult<AccessToken> {
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", secrets.client_id.as_str()),
        ("client_secret", secrets.client_secret.as_str()),
    ];
    let response = client.post(&secrets.token_uri).form(&form).send().await?;
    let (status, body) = http::read_body(response).await?;

    if !status.is_success() {
        let reason = body.get("error").and_then(Value::as_str).unwrap_or_default();
        let description = body
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or(reason);
        return Err(match reason {
            "invalid_grant" | "invalid_client" | "unauthorized_client" => ToolError::auth(format!(
                "Token refresh rejected ({reason}): {description}"
            ))
            .with_hint(REAUTH_HINT),
            _ => http::status_error(status, format!("Token refresh failed: HTTP {}", status.as_u16())),
        });
    }

    let parsed: RefreshResponse = serde_json::from_value(body)
        .map_err(|err| ToolError::upstream(format!("malformed token response: {err}")))?;
    info!(expires_in = parsed.expires_in, "gmail access token refreshed");
    Ok(AccessToken {
        value: parsed.access_token,
        expires_at: Utc::now() + Duration::seconds(parsed.expires_in),
    })
}
