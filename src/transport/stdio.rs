//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::backend::SupabaseBackend;
use crate::error::{ServerError, ServerResult};
use crate::mcp::SupabaseService;
use crate::tools::dispatcher::Dispatcher;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::info;

/// Stdio transport implementation.
///
/// This transport reads JSON-RPC messages from stdin and writes
/// responses to stdout, following the MCP protocol specification.
pub struct StdioTransport<B> {
    dispatcher: Arc<Dispatcher<B>>,
}

impl<B: SupabaseBackend> StdioTransport<B> {
    /// Create a new stdio transport serving the given dispatcher.
    pub fn new(dispatcher: Arc<Dispatcher<B>>) -> Self {
        Self { dispatcher }
    }
}

impl<B: SupabaseBackend> Transport for StdioTransport<B> {
    async fn run(&self) -> ServerResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = SupabaseService::new(self.dispatcher.clone());

        let running_service = service.serve(stdio()).await.map_err(|e| {
            ServerError::internal(format!("Failed to start stdio transport: {}", e))
        })?;

        tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                        Ok(())
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Stdio transport error");
                        Err(ServerError::internal(format!("Stdio transport error: {}", e)))
                    }
                }
            }
            _ = wait_for_signal() => {
                // stdin reads cannot be interrupted, so exit instead of returning
                info!("Shutdown signal received, exiting");
                std::process::exit(0);
            }
        }
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}
