//! MCP service implementation using rmcp.
//!
//! `SupabaseService` answers `tools/list` from the tool registry and routes
//! `tools/call` through the dispatcher. Tool calls always produce a result
//! envelope; protocol-level errors are reserved for the transport.

use crate::backend::SupabaseBackend;
use crate::tools::dispatcher::Dispatcher;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use std::sync::Arc;
use tracing::debug;

pub struct SupabaseService<B> {
    /// Shared dispatcher; clones of the service reuse the same registry and client
    dispatcher: Arc<Dispatcher<B>>,
}

impl<B> Clone for SupabaseService<B> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<B: SupabaseBackend> SupabaseService<B> {
    /// Create a new SupabaseService instance.
    ///
    /// # Arguments
    ///
    /// * `dispatcher` - Shared dispatcher holding the tool registry and backend client
    pub fn new(dispatcher: Arc<Dispatcher<B>>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher<B> {
        &self.dispatcher
    }
}

impl<B: SupabaseBackend> ServerHandler for SupabaseService<B> {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(
            self.dispatcher.registry().to_mcp_tools(),
        ))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "Received tool call");
        Ok(self
            .dispatcher
            .dispatch(&request.name, request.arguments)
            .await)
    }

    fn get_info(&self) -> ServerInfo {
        let tool_names: Vec<&str> = self
            .dispatcher
            .registry()
            .tools()
            .iter()
            .map(|t| t.name.as_str())
            .collect();

        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "supabase-mcp-server".to_owned(),
                title: Some("Supabase MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Administration tools for a Supabase project.\n\
                \n\
                ## Tools\n\
                {}\n\
                \n\
                ## Notes\n\
                - Table queries go through PostgREST: filter format is `column=operator.value` \
                (e.g. `id=eq.123`), order format is `column.asc` or `column.desc`.\n\
                - Raw SQL runs only through the migration tool.\n\
                - Errors are returned as JSON `{{\"error\": ..., \"details\": ...}}` with isError set.",
                tool_names.join(", ")
            )),
        }
    }
}
