//! Postgres access for the finance adapter.
//!
//! The pool is opened lazily and connection failures are reported as a
//! diagnostic rather than raised at startup, so the server keeps answering
//! with structured errors when the database is offline.

use std::time::Duration;

use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::types::Json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::query::{SqlParam, SqlQuery};
use crate::config::FinanceConfig;
use crate::errors::{ErrorKind, ToolError, ToolResult};
use crate::mcp::BoxFuture;

/// Only local connections are permitted.
pub const ALLOWED_HOST: &str = "localhost";

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Hint attached to every connection diagnostic.
pub const DEGRADED_HINT: &str =
    "The database may be unavailable. Other tools keep working normally.";

/// Row access used by the finance tools.
pub trait FinanceStore: Send + Sync {
    /// Open the pool if needed.
    ///
    /// Failure carries the diagnostic (missing database, bad credentials,
    /// unreachable server) instead of tearing anything down.
    fn ensure_connection(&self) -> BoxFuture<'_, ToolResult<()>>;

    /// Run a query and return its rows as JSON objects.
    fn fetch_rows<'a>(&'a self, query: &'a SqlQuery) -> BoxFuture<'a, ToolResult<Vec<Value>>>;

    /// Run a query and return its first row.
    fn fetch_row<'a>(&'a self, query: &'a SqlQuery) -> BoxFuture<'a, ToolResult<Option<Value>>> {
        Box::pin(async move { Ok(self.fetch_rows(query).await?.into_iter().next()) })
    }

    /// Close the pool. Safe to call repeatedly.
    fn close(&self) -> BoxFuture<'_, ()>;
}

/// Lazily connected `sqlx` pool.
pub struct PgFinanceStore {
    config: FinanceConfig,
    pool: Mutex<Option<PgPool>>,
}

impl PgFinanceStore {
    /// Create a store; nothing connects until the first query.
    #[must_use]
    pub fn new(config: FinanceConfig) -> Self {
        Self {
            config,
            pool: Mutex::new(None),
        }
    }

    fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(ALLOWED_HOST)
            .port(self.config.port)
            .database(&self.config.database)
            .options([(
                "statement_timeout",
                format!("{}s", self.config.command_timeout_seconds),
            )]);
        if !self.config.user.is_empty() {
            options = options.username(&self.config.user);
        }
        if !self.config.password.is_empty() {
            options = options.password(&self.config.password);
        }
        options
    }

    async fn pool(&self) -> ToolResult<PgPool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        let connected = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(self.config.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(self.connect_options())
            .await;

        match connected {
            Ok(pool) => {
                info!(database = %self.config.database, "connected to finance database");
                *guard = Some(pool.clone());
                Ok(pool)
            }
            Err(err) => {
                let diagnostic = connection_error(&self.config, &err);
                warn!(database = %self.config.database, %err, "finance database unavailable");
                Err(diagnostic)
            }
        }
    }

    async fn rows(&self, query: &SqlQuery) -> ToolResult<Vec<Value>> {
        let pool = self.pool().await?;
        let sql = format!(
            "SELECT COALESCE(json_agg(q), '[]'::json) FROM (\n{}\n) AS q",
            query.text()
        );

        let mut statement = sqlx::query_scalar::<sqlx::Postgres, Json<Value>>(&sql);
        for param in query.params() {
            statement = match param {
                SqlParam::Text(value) => statement.bind(value.clone()),
                SqlParam::Int(value) => statement.bind(*value),
                SqlParam::Float(value) => statement.bind(*value),
            };
        }

        let Json(rows) = statement.fetch_one(&pool).await.map_err(query_error)?;
        Ok(match rows {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            other => vec![other],
        })
    }
}

impl FinanceStore for PgFinanceStore {
    fn ensure_connection(&self) -> BoxFuture<'_, ToolResult<()>> {
        Box::pin(async move { self.pool().await.map(drop) })
    }

    fn fetch_rows<'a>(&'a self, query: &'a SqlQuery) -> BoxFuture<'a, ToolResult<Vec<Value>>> {
        Box::pin(self.rows(query))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let pool = self.pool.lock().await.take();
            if let Some(pool) = pool {
                pool.close().await;
                info!("finance database connection closed");
            }
        })
    }
}

/// Translate a pool-creation failure into an actionable diagnostic.
#[must_use]
pub fn connection_error(config: &FinanceConfig, err: &sqlx::Error) -> ToolError {
    let code = match err {
        sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
        _ => None,
    };

    let diagnostic = match (code.as_deref(), err) {
        (Some("3D000"), _) => ToolError::unavailable(format!(
            "Database '{}' does not exist. Please create it first with: createdb {}",
            config.database, config.database
        )),
        (Some("28P01" | "28000"), _) => ToolError::auth(
            "Invalid database credentials. Check DB_USER and DB_PASSWORD.",
        ),
        (_, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_)) => {
            ToolError::unavailable(format!(
                "Cannot connect to PostgreSQL at {ALLOWED_HOST}:{}. Is the database server \
                 running? If you're away from home, the database may not be accessible - this \
                 is expected behavior.",
                config.port
            ))
        }
        _ => ToolError::unavailable(format!("Database connection failed: {err}")),
    };
    diagnostic.with_hint(DEGRADED_HINT)
}

/// Translate a query failure.
#[must_use]
pub fn query_error(err: sqlx::Error) -> ToolError {
    match &err {
        sqlx::Error::Database(db) => {
            let code = db.code().map(|code| code.into_owned()).unwrap_or_default();
            let message = format!("Query failed: {}", db.message());
            if code == "57014" {
                ToolError::upstream("Query cancelled: statement timeout exceeded")
            } else if code.starts_with("42") || code.starts_with("22") {
                ToolError::invalid(message)
            } else if code.starts_with("08") {
                ToolError::unavailable(message).with_hint(DEGRADED_HINT)
            } else {
                ToolError::upstream(message)
            }
        }
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            ToolError::new(ErrorKind::Unavailable, format!("Database connection lost: {err}"))
                .with_hint(DEGRADED_HINT)
        }
        _ => ToolError::upstream(format!("Error: {err}")),
    }
}
