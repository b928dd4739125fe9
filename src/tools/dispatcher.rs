//! Request dispatcher.
//!
//! Routes a tool invocation to its typed handler and converts the outcome
//! into a `CallToolResult`. Errors never escape: every failure becomes an
//! `isError` result carrying `{error, details}`.

use crate::backend::SupabaseBackend;
use crate::config::DEFAULT_MIGRATION_FUNCTION;
use crate::error::{ServerError, ServerResult};
use crate::models::ToolKind;
use crate::tools::format::{error_result, success_result};
use crate::tools::registry::ToolRegistry;
use crate::tools::{migration, query, schema, users};
use futures_util::future::BoxFuture;
use rmcp::model::{CallToolResult, JsonObject};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};

/// Shared state handed to every handler.
pub struct ToolContext<B> {
    pub backend: B,
    /// Database function that executes raw SQL
    pub migration_function: String,
}

impl<B> ToolContext<B> {
    pub fn new(backend: B, migration_function: impl Into<String>) -> Self {
        Self {
            backend,
            migration_function: migration_function.into(),
        }
    }
}

/// A typed tool handler.
pub type ToolHandler<B> =
    for<'a> fn(&'a ToolContext<B>, JsonObject) -> BoxFuture<'a, ServerResult<JsonValue>>;

/// Deserialize tool arguments into the tool's input type.
pub fn parse_arguments<T: DeserializeOwned>(kind: ToolKind, args: JsonObject) -> ServerResult<T> {
    serde_json::from_value(JsonValue::Object(args))
        .map_err(|e| ServerError::invalid_arguments(kind.base_name(), e.to_string()))
}

/// Read a row count, accepting integral floats such as `5.0`.
fn count_from_value(value: &JsonValue) -> Result<u32, String> {
    let JsonValue::Number(n) = value else {
        return Err(format!("expected a non-negative integer, got {}", value));
    };
    let count = match (n.as_u64(), n.as_f64()) {
        (Some(v), _) => u32::try_from(v).ok(),
        (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => {
            Some(f as u32)
        }
        _ => None,
    };
    count.ok_or_else(|| format!("expected a non-negative integer, got {}", n))
}

/// `deserialize_with` helper for count arguments.
pub(crate) fn deserialize_count<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<u32, D::Error> {
    let value = JsonValue::deserialize(deserializer)?;
    count_from_value(&value).map_err(de::Error::custom)
}

/// `deserialize_with` helper for optional count arguments; `null` is absent.
pub(crate) fn deserialize_optional_count<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => Ok(None),
        value => count_from_value(&value).map(Some).map_err(de::Error::custom),
    }
}

fn handler_for<B: SupabaseBackend>(kind: ToolKind) -> ToolHandler<B> {
    match kind {
        ToolKind::ListTables => schema::list_tables::<B>,
        ToolKind::ExecuteSql => query::execute_sql::<B>,
        ToolKind::ListUsers => users::list_users::<B>,
        ToolKind::GetUser => users::get_user::<B>,
        ToolKind::ExecuteMigration => migration::execute_migration::<B>,
    }
}

/// One handler per tool kind.
pub fn default_handlers<B: SupabaseBackend>() -> Vec<(ToolKind, ToolHandler<B>)> {
    ToolKind::ALL
        .iter()
        .map(|&kind| (kind, handler_for::<B>(kind)))
        .collect()
}

pub struct Dispatcher<B> {
    context: ToolContext<B>,
    registry: ToolRegistry,
    handlers: HashMap<String, ToolHandler<B>>,
}

impl<B: SupabaseBackend> Dispatcher<B> {
    /// Create a dispatcher with the built-in handlers.
    pub fn new(context: ToolContext<B>, registry: ToolRegistry) -> ServerResult<Self> {
        Self::with_handlers(context, registry, default_handlers())
    }

    /// Create a dispatcher with an explicit handler table.
    ///
    /// Fails unless every registered tool has exactly one handler, every
    /// handler has a registered tool, and tool names are unique.
    pub fn with_handlers(
        context: ToolContext<B>,
        registry: ToolRegistry,
        handlers: Vec<(ToolKind, ToolHandler<B>)>,
    ) -> ServerResult<Self> {
        let mut by_kind: HashMap<ToolKind, ToolHandler<B>> = HashMap::new();
        for (kind, handler) in handlers {
            if by_kind.insert(kind, handler).is_some() {
                return Err(ServerError::config(format!(
                    "Duplicate handler for tool '{}'",
                    kind.base_name()
                )));
            }
        }

        let mut table = HashMap::new();
        for descriptor in registry.tools() {
            let handler = by_kind.remove(&descriptor.kind).ok_or_else(|| {
                ServerError::config(format!("No handler for tool '{}'", descriptor.name))
            })?;
            if table.insert(descriptor.name.clone(), handler).is_some() {
                return Err(ServerError::config(format!(
                    "Duplicate tool name '{}'",
                    descriptor.name
                )));
            }
        }

        if let Some(kind) = by_kind.keys().next() {
            return Err(ServerError::config(format!(
                "Handler for unregistered tool '{}'",
                kind.base_name()
            )));
        }

        Ok(Self {
            context,
            registry,
            handlers: table,
        })
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ToolContext<B> {
        &self.context
    }

    /// Run a tool and wrap the outcome in a result envelope.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let start = Instant::now();
        match self.invoke(name, arguments.unwrap_or_default()).await {
            Ok(payload) => {
                info!(
                    tool = name,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Tool call succeeded"
                );
                success_result(&payload)
            }
            Err(err) => {
                warn!(
                    tool = name,
                    upstream = err.is_upstream(),
                    error = %err,
                    "Tool call failed"
                );
                error_result(&err)
            }
        }
    }

    async fn invoke(&self, name: &str, arguments: JsonObject) -> ServerResult<JsonValue> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ServerError::unknown_tool(name))?;
        handler(&self.context, arguments).await
    }

    /// Create a dispatcher from a backend using default settings.
    pub fn with_backend(backend: B) -> ServerResult<Self> {
        Self::new(
            ToolContext::new(backend, DEFAULT_MIGRATION_FUNCTION),
            ToolRegistry::default(),
        )
    }
}
