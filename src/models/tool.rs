//! Tool descriptors exposed through `tools/list`.

use rmcp::model::{JsonObject, Tool};
use serde::Serialize;
use std::sync::Arc;

/// Every tool this server knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ListTables,
    ExecuteSql,
    ListUsers,
    GetUser,
    ExecuteMigration,
}

impl ToolKind {
    /// All tools, in listing order.
    pub const ALL: [ToolKind; 5] = [
        Self::ListTables,
        Self::ExecuteSql,
        Self::ListUsers,
        Self::GetUser,
        Self::ExecuteMigration,
    ];

    /// Unprefixed tool name.
    pub fn base_name(&self) -> &'static str {
        match self {
            Self::ListTables => "list_tables",
            Self::ExecuteSql => "execute_sql",
            Self::ListUsers => "list_users",
            Self::GetUser => "get_user",
            Self::ExecuteMigration => "execute_migration",
        }
    }
}

/// Name, description and input schema of one tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    #[serde(skip)]
    pub kind: ToolKind,
    pub name: String,
    pub description: String,
    pub input_schema: JsonObject,
}

impl ToolDescriptor {
    /// Names of the properties the schema marks as required.
    pub fn required(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Convert into the rmcp wire model.
    pub fn to_tool(&self) -> Tool {
        Tool::new(
            self.name.clone(),
            self.description.clone(),
            Arc::new(self.input_schema.clone()),
        )
    }
}
