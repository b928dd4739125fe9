//! Error types for the Supabase MCP Server.
//!
//! This module defines all error types using `thiserror`. Every per-invocation
//! error ends up in a tool result envelope, so each variant carries a message
//! an AI assistant can act on.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Error reported by a Supabase API (PostgREST or GoTrue).
///
/// PostgREST returns `{message, details, hint, code}`; GoTrue returns
/// `{msg, code, error_code}` or the OAuth-style `{error, error_description}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// HTTP status code of the failed response
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// e.g. "42P01" for undefined table, "user_not_found" for GoTrue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            hint: None,
            code: None,
        }
    }

    /// Build an error from a failed response body.
    ///
    /// Falls back to the raw body text, or `HTTP <status>` for an empty body.
    pub fn from_body(status: u16, body: &str) -> Self {
        let fallback = || {
            let text = body.trim();
            if text.is_empty() {
                format!("HTTP {}", status)
            } else {
                text.to_string()
            }
        };

        let Ok(JsonValue::Object(obj)) = serde_json::from_str::<JsonValue>(body) else {
            return Self::new(status, fallback());
        };

        let message = ["message", "msg", "error_description", "error"]
            .iter()
            .find_map(|key| string_field(&obj, key))
            .unwrap_or_else(fallback);

        Self {
            status,
            message,
            details: string_field(&obj, "details"),
            hint: string_field(&obj, "hint"),
            code: string_field(&obj, "error_code").or_else(|| string_field(&obj, "code")),
        }
    }
}

/// Read a non-empty string (or number) field from a JSON object.
fn string_field(obj: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match obj.get(key)? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Invalid filter '{input}': {reason}. Expected format: column=operator.value")]
    InvalidFilter { input: String, reason: String },

    #[error("Invalid order '{input}': {reason}. Expected format: column.direction")]
    InvalidOrder { input: String, reason: String },

    #[error("{}", .0.message)]
    Upstream(ApiError),

    #[error("Request failed: {message}")]
    Http { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown tool error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    /// Create an invalid arguments error.
    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an invalid filter error.
    pub fn invalid_filter(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid order error.
    pub fn invalid_order(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOrder {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a request failure error.
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Provider-supplied detail for this error: `details`, then `hint`.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Upstream(api) => api.details.as_deref().or(api.hint.as_deref()),
            _ => None,
        }
    }

    /// Check if this error came back from the Supabase API.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }

    /// Structured payload returned to the caller: `{error, details}`.
    pub fn to_payload(&self) -> JsonValue {
        serde_json::json!({
            "error": self.to_string(),
            "details": self.details(),
        })
    }
}

impl From<ApiError> for ServerError {
    fn from(err: ApiError) -> Self {
        Self::Upstream(err)
    }
}

impl From<reqwest::Error> for ServerError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {}", err))
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
