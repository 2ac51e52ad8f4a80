//! Stdio transport setup.
//!
//! Wires an [`AdapterServer`] to stdin/stdout. The service runs until the
//! host closes stdin or the cancellation token fires.

use std::sync::Arc;

use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::dispatch::{Dispatcher, ToolSet};
use super::handler::AdapterServer;
use crate::{AppError, Result};

/// Serve one adapter over stdio until stdin closes or `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Mcp` if the transport fails to initialize or the
/// service terminates abnormally.
pub async fn serve_stdio<T: ToolSet>(dispatcher: Arc<Dispatcher<T>>, ct: CancellationToken) -> Result<()> {
    let server_name = dispatcher.tools().server_name();
    let server = AdapterServer::new(dispatcher);

    info!(server = server_name, "starting stdio MCP transport");
    let service = server
        .serve_with_ct(stdio(), ct)
        .await
        .map_err(|err| AppError::Mcp(format!("stdio transport failed: {err}")))?;

    service
        .waiting()
        .await
        .map_err(|err| AppError::Mcp(format!("stdio service error: {err}")))?;

    info!(server = server_name, "stdio MCP transport shut down");
    Ok(())
}
