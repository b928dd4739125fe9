//! Migration tool.
//!
//! Runs caller-supplied SQL through the SQL-executing database function
//! (`exec_migration` by default). The function must already exist in the
//! project, e.g.:
//!
//! ```sql
//! create or replace function exec_migration(sql_query text)
//! returns json language plpgsql security definer as $$ ... $$;
//! ```

use crate::backend::SupabaseBackend;
use crate::error::ServerResult;
use crate::models::ToolKind;
use crate::tools::dispatcher::{ToolContext, parse_arguments};
use crate::tools::format::to_payload;
use futures_util::future::BoxFuture;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use tracing::info;

/// Name of the SQL parameter of the database function.
pub const SQL_PARAM: &str = "sql_query";

pub const MIGRATION_SUCCESS_MESSAGE: &str = "Migration executed successfully";

/// Build the parameter object for the SQL-executing function.
pub fn sql_params(sql: &str) -> JsonValue {
    let mut params = JsonObject::new();
    params.insert(SQL_PARAM.to_string(), json!(sql));
    JsonValue::Object(params)
}

/// Input for the execute_migration tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteMigrationInput {
    /// SQL migration code to execute
    pub sql: String,
}

/// Output from the execute_migration tool.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteMigrationOutput {
    pub success: bool,
    pub message: String,
    /// Whatever the database function returned
    pub result: JsonValue,
}

/// Execute a SQL migration.
pub fn execute_migration<B: SupabaseBackend>(
    ctx: &ToolContext<B>,
    args: JsonObject,
) -> BoxFuture<'_, ServerResult<JsonValue>> {
    Box::pin(async move {
        let input: ExecuteMigrationInput = parse_arguments(ToolKind::ExecuteMigration, args)?;
        info!(
            function = %ctx.migration_function,
            sql_len = input.sql.len(),
            "Executing migration"
        );

        let result = ctx
            .backend
            .rpc(&ctx.migration_function, sql_params(&input.sql))
            .await?;

        let output = ExecuteMigrationOutput {
            success: true,
            message: MIGRATION_SUCCESS_MESSAGE.to_string(),
            result,
        };
        to_payload(&output)
    })
}
