//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Keychain service name under which credentials are looked up.
pub const KEYRING_SERVICE: &str = "data-adapters";

/// Postgres connection settings for the finance adapter.
///
/// The host is fixed to `localhost`; only port, database name, and pool
/// sizing are configurable. Credentials are populated at runtime.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct FinanceConfig {
    /// Postgres port on localhost.
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Database name.
    #[serde(default = "default_db_name")]
    pub database: String,
    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Statement timeout applied to every pooled connection.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,
    /// Database user (populated at runtime).
    #[serde(skip)]
    pub user: String,
    /// Database password (populated at runtime).
    #[serde(skip)]
    pub password: String,
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "money_stuff".into()
}

fn default_max_connections() -> u32 {
    5
}

fn default_command_timeout() -> u64 {
    30
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            port: default_db_port(),
            database: default_db_name(),
            max_connections: default_max_connections(),
            command_timeout_seconds: default_command_timeout(),
            user: String::new(),
            password: String::new(),
        }
    }
}

/// Gmail API endpoints and OAuth file locations.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GmailConfig {
    /// Base URL of the Gmail REST API.
    #[serde(default = "default_gmail_base_url")]
    pub base_url: String,
    /// OAuth client secret file downloaded from the cloud console.
    #[serde(default = "default_client_secrets_path")]
    pub client_secrets_path: PathBuf,
    /// Authorized-user token file holding the refresh token.
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

fn default_gmail_base_url() -> String {
    "https://gmail.googleapis.com/gmail/v1".into()
}

fn default_client_secrets_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_token_path() -> PathBuf {
    PathBuf::from("token.json")
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            base_url: default_gmail_base_url(),
            client_secrets_path: default_client_secrets_path(),
            token_path: default_token_path(),
        }
    }
}

/// Settings shared by the API-key HTTP adapters (news, weather, stocks).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ApiConfig {
    /// Base URL of the upstream API.
    pub base_url: String,
    /// API key (populated at runtime).
    #[serde(skip)]
    pub api_key: String,
}

impl ApiConfig {
    fn with_base(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            api_key: String::new(),
        }
    }
}

fn default_news() -> ApiConfig {
    ApiConfig::with_base("https://newsapi.org/v2")
}

fn default_weather() -> ApiConfig {
    ApiConfig::with_base("https://api.openweathermap.org")
}

fn default_stocks() -> ApiConfig {
    ApiConfig::with_base("https://www.alphavantage.co/query")
}

/// Global configuration parsed from an optional `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Personal-finance database settings.
    #[serde(default)]
    pub finance: FinanceConfig,
    /// Gmail API settings.
    #[serde(default)]
    pub gmail: GmailConfig,
    /// NewsAPI settings.
    #[serde(default = "default_news")]
    pub news: ApiConfig,
    /// OpenWeatherMap settings.
    #[serde(default = "default_weather")]
    pub weather: ApiConfig,
    /// Alpha Vantage settings.
    #[serde(default = "default_stocks")]
    pub stocks: ApiConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            finance: FinanceConfig::default(),
            gmail: GmailConfig::default(),
            news: default_news(),
            weather: default_weather(),
            stocks: default_stocks(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Populate the finance database credentials.
    ///
    /// A missing user is logged, not fatal: the finance server starts in
    /// degraded mode and reports the connection failure per invocation.
    pub async fn load_finance_credentials(&mut self) {
        self.finance.user = load_optional_credential("db_user", "DB_USER").await;
        self.finance.password = load_optional_credential("db_password", "DB_PASSWORD").await;
        if self.finance.user.is_empty() {
            warn!("DB_USER not set; finance queries will fail to authenticate");
        }
    }

    /// Populate the NewsAPI key.
    pub async fn load_news_credentials(&mut self) {
        self.news.api_key = load_optional_credential("news_api_key", "NEWS_API_KEY").await;
        if self.news.api_key.is_empty() {
            warn!("NEWS_API_KEY not set; upstream calls will be rejected");
        }
    }

    /// Populate the OpenWeatherMap key.
    pub async fn load_weather_credentials(&mut self) {
        self.weather.api_key =
            load_optional_credential("openweather_api_key", "OPENWEATHER_API_KEY").await;
        if self.weather.api_key.is_empty() {
            warn!("OPENWEATHER_API_KEY not set; upstream calls will be rejected");
        }
    }

    /// Populate the Alpha Vantage key, falling back to the public `demo` key.
    pub async fn load_stocks_credentials(&mut self) {
        let key = load_optional_credential("alpha_vantage_api_key", "ALPHA_VANTAGE_API_KEY").await;
        self.stocks.api_key = if key.is_empty() {
            warn!("ALPHA_VANTAGE_API_KEY not set; using the demo key");
            "demo".into()
        } else {
            key
        };
    }

    fn validate(&self) -> Result<()> {
        if self.finance.max_connections == 0 {
            return Err(AppError::Config(
                "finance.max_connections must be greater than zero".into(),
            ));
        }

        for (name, url) in [
            ("gmail.base_url", self.gmail.base_url.as_str()),
            ("news.base_url", self.news.base_url.as_str()),
            ("weather.base_url", self.weather.base_url.as_str()),
            ("stocks.base_url", self.stocks.base_url.as_str()),
        ] {
            if url.trim().is_empty() {
                return Err(AppError::Config(format!("{name} must not be empty")));
            }
        }

        Ok(())
    }
}

/// Load a credential from OS keychain with env-var fallback.
///
/// Returns an empty string when neither source provides a value.
async fn load_optional_credential(keyring_key: &str, env_key: &str) -> String {
    match load_credential(keyring_key, env_key).await {
        Ok(value) => value,
        Err(err) => {
            warn!(key = keyring_key, %err, "credential unavailable");
            String::new()
        }
    }
}

/// Load a single credential from OS keychain with env-var fallback.
///
/// # Errors
///
/// Returns `AppError::Config` if neither keychain nor env var provide a value.
pub async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(keyring::Error::NoEntry) => {}
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    match env::var(env_key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))),
    }
}
