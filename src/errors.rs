//! Error types shared across the application.
//!
//! [`AppError`] covers process-level failures (configuration, startup,
//! transport). [`ToolError`] is the per-invocation failure every adapter
//! reports; the dispatcher turns it into a structured error payload instead
//! of letting it escape.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering process-level failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// MCP protocol or transport failure.
    Mcp(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Mcp(msg) => write!(f, "mcp: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

/// Category of a tool invocation failure.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad credentials or API key.
    AuthenticationFailure,
    /// No matching entity upstream.
    NotFound,
    /// Upstream quota exceeded.
    RateLimited,
    /// Connection refused or host unreachable.
    Unavailable,
    /// Malformed invocation: unknown tool, missing argument, rejected query.
    InvalidRequest,
    /// Unexpected upstream response or unclassified failure.
    UpstreamError,
}

impl ErrorKind {
    /// Stable snake-case label used in payloads and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationFailure => "authentication_failure",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::Unavailable => "unavailable",
            Self::InvalidRequest => "invalid_request",
            Self::UpstreamError => "upstream_error",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Optional remediation hint.
    pub hint: Option<String>,
}

/// Result type returned by adapter operations.
pub type ToolResult<T> = std::result::Result<T, ToolError>;

impl ToolError {
    /// Build an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a remediation hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Bad credentials or API key.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationFailure, message)
    }

    /// No matching entity.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Quota exceeded.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited, message)
    }

    /// External system unreachable.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    /// Malformed request.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Unexpected upstream response.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamError, message)
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ToolError {}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::unavailable(format!("upstream unreachable: {err}"))
        } else if err.is_decode() {
            Self::upstream(format!("malformed upstream response: {err}"))
        } else {
            Self::upstream(err.to_string())
        }
    }
}
