//! Configuration handling for the Supabase MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use crate::error::{ServerError, ServerResult};
use clap::{Parser, ValueEnum};
use std::fmt;
use url::Url;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";

/// Database function used to run raw SQL (table listing and migrations).
pub const DEFAULT_MIGRATION_FUNCTION: &str = "exec_migration";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP (for web clients)
    Http,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Validated connection settings for a Supabase project.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://<ref>.supabase.co`
    pub url: Url,
    /// Service-role API key (sensitive - never logged)
    pub service_role_key: String,
}

impl SupabaseConfig {
    /// Validate a project URL and service-role key.
    pub fn new(url: &str, service_role_key: &str) -> ServerResult<Self> {
        let url = Url::parse(url.trim())
            .map_err(|e| ServerError::config(format!("Invalid SUPABASE_URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ServerError::config(format!(
                "Invalid SUPABASE_URL: unsupported scheme '{}', expected http or https",
                url.scheme()
            )));
        }

        let service_role_key = service_role_key.trim();
        if service_role_key.is_empty() {
            return Err(ServerError::config(
                "SUPABASE_SERVICE_ROLE_KEY must not be empty",
            ));
        }

        Ok(Self {
            url,
            service_role_key: service_role_key.to_string(),
        })
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}

/// Configuration for the Supabase MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "supabase-mcp-server",
    about = "MCP server for Supabase administration - enables AI assistants to query tables, inspect users and run migrations",
    version,
    author
)]
pub struct Config {
    /// Supabase project URL (e.g. https://<project-ref>.supabase.co)
    #[arg(long, value_name = "URL", env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase service-role key. Grants full access to the project.
    #[arg(
        long,
        value_name = "KEY",
        env = "SUPABASE_SERVICE_ROLE_KEY",
        hide_env_values = true
    )]
    pub service_role_key: Option<String>,

    /// Database function that executes raw SQL, called with a `sql_query` parameter
    #[arg(
        long,
        default_value = DEFAULT_MIGRATION_FUNCTION,
        env = "SUPABASE_MIGRATION_FUNCTION"
    )]
    pub migration_function: String,

    /// Prefix prepended to every tool name (e.g. "itpi_")
    #[arg(long, default_value = "", env = "MCP_TOOL_PREFIX")]
    pub tool_prefix: String,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output (always on for http transport). Logs go to stderr.
    #[arg(long, env = "MCP_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            supabase_url: None,
            service_role_key: None,
            migration_function: DEFAULT_MIGRATION_FUNCTION.to_string(),
            tool_prefix: String::new(),
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Validate the Supabase connection settings.
    ///
    /// Both the URL and the service-role key are required; blank values
    /// count as missing.
    pub fn supabase(&self) -> ServerResult<SupabaseConfig> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|s| !s.trim().is_empty())
        }

        match (present(&self.supabase_url), present(&self.service_role_key)) {
            (Some(url), Some(key)) => SupabaseConfig::new(url, key),
            _ => Err(ServerError::config(
                "SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY must be set",
            )),
        }
    }

    /// Whether logging should be initialized.
    pub fn logging_enabled(&self) -> bool {
        self.enable_logs || self.transport == TransportMode::Http
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.http_host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.migration_function, DEFAULT_MIGRATION_FUNCTION);
        assert!(config.tool_prefix.is_empty());
    }

    #[test]
    fn test_parse_from_args() {
        let config = Config::try_parse_from([
            "supabase-mcp-server",
            "--supabase-url",
            "https://abc.supabase.co",
            "--service-role-key",
            "secret",
            "--tool-prefix",
            "itpi_",
            "--transport",
            "http",
        ])
        .unwrap();
        assert_eq!(config.tool_prefix, "itpi_");
        assert_eq!(config.transport, TransportMode::Http);

        let supabase = config.supabase().unwrap();
        assert_eq!(supabase.url.as_str(), "https://abc.supabase.co/");
        assert_eq!(supabase.service_role_key, "secret");
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let config = Config {
            service_role_key: Some("secret".to_string()),
            ..Config::default()
        };
        let err = config.supabase().unwrap_err();
        assert!(matches!(err, ServerError::Config { .. }));
        assert!(err.to_string().contains("SUPABASE_URL"));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let config = Config {
            supabase_url: Some("https://abc.supabase.co".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.supabase(),
            Err(ServerError::Config { .. })
        ));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = Config {
            supabase_url: Some("  ".to_string()),
            service_role_key: Some("secret".to_string()),
            ..Config::default()
        };
        assert!(config.supabase().is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(SupabaseConfig::new("not a url", "secret").is_err());
        let err = SupabaseConfig::new("ftp://abc.supabase.co", "secret").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = SupabaseConfig::new("https://abc.supabase.co", "super-secret").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_logging_enabled() {
        assert!(!Config::default().logging_enabled());
        let config = Config {
            transport: TransportMode::Http,
            ..Config::default()
        };
        assert!(config.logging_enabled());
    }
}
