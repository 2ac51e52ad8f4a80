//! MCP server handler shared by every adapter.

use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use tracing::{info_span, Instrument};

use super::dispatch::{Dispatcher, ToolSet};

/// MCP server exposing one adapter's catalog.
pub struct AdapterServer<T: ToolSet> {
    dispatcher: Arc<Dispatcher<T>>,
}

impl<T: ToolSet> AdapterServer<T> {
    /// Create a server over a shared dispatcher.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher<T>>) -> Self {
        Self { dispatcher }
    }

    /// The shared dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher<T>> {
        &self.dispatcher
    }
}

impl<T: ToolSet> ServerHandler for AdapterServer<T> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.dispatcher.tools().server_name().into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(self.dispatcher.tools().instructions().to_owned()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, rmcp::ErrorData>> + Send + '_ {
        let span = info_span!(
            "call_tool",
            server = self.dispatcher.tools().server_name(),
            tool = %request.name
        );
        async move {
            let result = self
                .dispatcher
                .call(&request.name, request.arguments)
                .await;
            Ok(result)
        }
        .instrument(span)
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, rmcp::ErrorData>> + Send + '_ {
        let tools = self.dispatcher.catalog().to_vec();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }
}
