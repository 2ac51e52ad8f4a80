//! Result payloads returned to the caller.
//!
//! Every invocation produces exactly one text content block: pretty-printed
//! JSON for structured results, or a plain-text body for the adapters that
//! render human-readable reports.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::{ToolError, ToolResult};

/// Reshaped response ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured JSON body.
    Json(Value),
    /// Plain-text body.
    Text(String),
}

impl Payload {
    /// Serialize any value into a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an `UpstreamError` if the value cannot be represented as JSON.
    pub fn json(value: impl Serialize) -> ToolResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|err| ToolError::upstream(format!("failed to serialize payload: {err}")))
    }

    /// Wrap a plain-text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text(body.into())
    }

    /// Render the body that goes into the content block.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Text(body) => body.clone(),
        }
    }

    /// Borrow the JSON body, if any.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Convert into a successful tool result.
    #[must_use]
    pub fn into_call_result(self) -> CallToolResult {
        CallToolResult::success(vec![Content::text(self.render())])
    }
}

/// Structured error body: `error` flag, kind, message, optional hint.
#[must_use]
pub fn error_body(err: &ToolError) -> Value {
    let mut body = json!({
        "error": true,
        "kind": err.kind,
        "message": err.message,
    });
    if let (Some(hint), Value::Object(map)) = (err.hint.as_ref(), &mut body) {
        map.insert("hint".into(), Value::String(hint.clone()));
    }
    body
}

/// Convert a tool failure into an error-flagged tool result.
#[must_use]
pub fn error_result(err: &ToolError) -> CallToolResult {
    let body = Payload::Json(error_body(err)).render();
    CallToolResult::error(vec![Content::text(body)])
}
