//! Schema introspection tool.
//!
//! `list_tables` runs a fixed catalog query through the SQL-executing
//! database function.

use crate::backend::SupabaseBackend;
use crate::error::ServerResult;
use crate::tools::dispatcher::ToolContext;
use crate::tools::migration::sql_params;
use futures_util::future::BoxFuture;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Catalog query listing the tables of the `public` schema.
pub const LIST_TABLES_SQL: &str = "SELECT schemaname, tablename, tableowner \
     FROM pg_tables \
     WHERE schemaname = 'public' \
     ORDER BY tablename;";

/// Input for the list_tables tool (takes no arguments).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListTablesInput {}

/// List the tables in the `public` schema.
pub fn list_tables<B: SupabaseBackend>(
    ctx: &ToolContext<B>,
    _args: JsonObject,
) -> BoxFuture<'_, ServerResult<JsonValue>> {
    Box::pin(async move {
        ctx.backend
            .rpc(&ctx.migration_function, sql_params(LIST_TABLES_SQL))
            .await
    })
}
