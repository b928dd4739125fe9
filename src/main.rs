//! Supabase MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to administer a Supabase project over stdio or HTTP.

use std::sync::Arc;
use supabase_mcp_server::backend::SupabaseClient;
use supabase_mcp_server::config::{Config, TransportMode};
use supabase_mcp_server::tools::{Dispatcher, ToolContext, ToolRegistry};
use supabase_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs always go to stderr; stdout carries the stdio protocol.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse_args();

    if config.logging_enabled() {
        init_tracing(&config);
    }

    let supabase = match config.supabase() {
        Ok(supabase) => supabase,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("Usage: supabase-mcp-server --supabase-url <URL> --service-role-key <KEY>");
            eprintln!();
            eprintln!("Or set the environment variables:");
            eprintln!("  SUPABASE_URL=https://<project-ref>.supabase.co");
            eprintln!("  SUPABASE_SERVICE_ROLE_KEY=<service role key>");
            std::process::exit(1);
        }
    };

    info!(
        transport = %config.transport,
        url = %supabase.url,
        "Starting Supabase MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = SupabaseClient::new(&supabase)?;
    let registry = ToolRegistry::new(&config.tool_prefix);
    let dispatcher = Arc::new(Dispatcher::new(
        ToolContext::new(client, &config.migration_function),
        registry,
    )?);
    info!(
        tools = dispatcher.registry().len(),
        migration_function = %config.migration_function,
        "Tool registry ready"
    );

    // Run the appropriate transport
    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            StdioTransport::new(dispatcher).run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            HttpTransport::new(
                dispatcher,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            )
            .run()
            .await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
