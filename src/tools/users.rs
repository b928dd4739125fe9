//! Auth user tools.
//!
//! `list_users` and `get_user` read from the GoTrue admin API.

use crate::backend::SupabaseBackend;
use crate::error::{ServerError, ServerResult};
use crate::models::{DEFAULT_USERS_PER_PAGE, ToolKind};
use crate::tools::dispatcher::{ToolContext, deserialize_count, parse_arguments};
use crate::tools::format::to_payload;
use futures_util::future::BoxFuture;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

fn default_limit() -> u32 {
    DEFAULT_USERS_PER_PAGE
}

/// Input for the list_users tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListUsersInput {
    /// Maximum number of users to return (default 50)
    #[serde(default = "default_limit", deserialize_with = "deserialize_count")]
    pub limit: u32,
}

/// Input for the get_user tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetUserInput {
    /// User UUID
    pub user_id: String,
}

/// List the first page of auth users.
pub fn list_users<B: SupabaseBackend>(
    ctx: &ToolContext<B>,
    args: JsonObject,
) -> BoxFuture<'_, ServerResult<JsonValue>> {
    Box::pin(async move {
        let input: ListUsersInput = parse_arguments(ToolKind::ListUsers, args)?;
        let page = ctx.backend.list_users(1, input.limit).await?;
        to_payload(&page)
    })
}

/// Fetch one auth user by id.
pub fn get_user<B: SupabaseBackend>(
    ctx: &ToolContext<B>,
    args: JsonObject,
) -> BoxFuture<'_, ServerResult<JsonValue>> {
    Box::pin(async move {
        let input: GetUserInput = parse_arguments(ToolKind::GetUser, args)?;
        let user_id = Uuid::parse_str(input.user_id.trim()).map_err(|e| {
            ServerError::invalid_arguments(
                ToolKind::GetUser.base_name(),
                format!("user_id '{}' is not a valid UUID: {}", input.user_id, e),
            )
        })?;

        let user = ctx.backend.get_user(&user_id.to_string()).await?;
        Ok(json!({ "user": user }))
    })
}
