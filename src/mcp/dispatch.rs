//! Routing of tool invocations to adapter operations.
//!
//! Each adapter declares a static catalog plus a tagged request enum. The
//! [`Dispatcher`] checks the tool name, enforces the catalog's `required`
//! list, decodes the arguments into the adapter's request type, applies its
//! clamps and defaults, and only then hands the request to the adapter. Any
//! failure on the way becomes a structured error payload.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

use rmcp::model::{CallToolResult, Tool};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use super::catalog;
use super::payload::{self, Payload};
use crate::errors::{ErrorKind, ToolError, ToolResult};

/// Boxed future returned by dyn-compatible adapter traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Typed tool request decoded from `{"tool": <name>, "arguments": {...}}`.
pub trait ToolRequest: DeserializeOwned + Send + Sized {
    /// Apply clamps and defaults, rejecting semantically invalid arguments.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRequest` error when an argument is out of domain.
    fn normalize(self) -> ToolResult<Self> {
        Ok(self)
    }
}

/// One adapter: a static catalog and an executor for its requests.
pub trait ToolSet: Send + Sync + 'static {
    /// Decoded request type covering every catalog entry.
    type Request: ToolRequest;

    /// Server name announced to the host.
    fn server_name(&self) -> &'static str;

    /// Instructions announced during initialization.
    fn instructions(&self) -> &'static str;

    /// Static tool catalog.
    fn catalog(&self) -> Vec<Tool>;

    /// Execute a decoded, normalized request.
    fn execute(&self, request: Self::Request) -> BoxFuture<'_, ToolResult<Payload>>;

    /// Release the adapter's upstream session. Must be idempotent.
    fn close(&self) -> BoxFuture<'_, ()>;
}

/// Validates, decodes, and routes invocations for one adapter.
pub struct Dispatcher<T: ToolSet> {
    tools: T,
    catalog: Vec<Tool>,
    closed: AtomicBool,
}

impl<T: ToolSet> Dispatcher<T> {
    /// Wrap an adapter, snapshotting its catalog.
    pub fn new(tools: T) -> Self {
        let catalog = tools.catalog();
        Self {
            tools,
            catalog,
            closed: AtomicBool::new(false),
        }
    }

    /// The adapter's tool catalog.
    #[must_use]
    pub fn catalog(&self) -> &[Tool] {
        &self.catalog
    }

    /// The wrapped adapter.
    #[must_use]
    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Validate and decode arguments without executing anything.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for unknown tools, missing required fields,
    /// arguments that do not match the tool's shape, or out-of-domain values.
    pub fn decode(&self, name: &str, arguments: Option<Map<String, Value>>) -> ToolResult<T::Request> {
        let tool = catalog::find(&self.catalog, name)
            .ok_or_else(|| ToolError::invalid(format!("Unknown tool: {name}")))?;

        let arguments = arguments.unwrap_or_default();
        let missing = catalog::missing_required(tool, &arguments);
        if !missing.is_empty() {
            return Err(ToolError::invalid(format!(
                "Missing required argument(s) for {name}: {}",
                missing.join(", ")
            )));
        }

        let envelope = json!({ "tool": name, "arguments": Value::Object(arguments) });
        let request: T::Request = serde_json::from_value(envelope)
            .map_err(|err| ToolError::invalid(format!("Invalid arguments for {name}: {err}")))?;
        request.normalize()
    }

    /// Decode and execute one invocation.
    ///
    /// # Errors
    ///
    /// Returns the decoding failure or whatever the adapter reports.
    pub async fn dispatch(&self, name: &str, arguments: Option<Map<String, Value>>) -> ToolResult<Payload> {
        let request = self.decode(name, arguments)?;
        self.tools.execute(request).await
    }

    /// Execute one invocation, converting every failure into an error payload.
    pub async fn call(&self, name: &str, arguments: Option<Map<String, Value>>) -> CallToolResult {
        match self.dispatch(name, arguments).await {
            Ok(payload) => {
                info!(server = self.tools.server_name(), tool = name, "tool call completed");
                payload.into_call_result()
            }
            Err(err) => {
                if err.kind == ErrorKind::InvalidRequest {
                    warn!(server = self.tools.server_name(), tool = name, %err, "tool call rejected");
                } else {
                    error!(server = self.tools.server_name(), tool = name, %err, "tool call failed");
                }
                payload::error_result(&err)
            }
        }
    }

    /// Release the adapter session; later calls are no-ops.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.tools.close().await;
        info!(server = self.tools.server_name(), "adapter session closed");
    }

    /// Whether [`close`](Self::close) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
