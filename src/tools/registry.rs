//! Tool registry.
//!
//! Declares every tool with its name, description and JSON input schema.
//! Schemas are generated from the typed input structs and are advisory:
//! arguments are validated when the handler deserializes them.

use crate::models::{ToolDescriptor, ToolKind};
use crate::tools::migration::ExecuteMigrationInput;
use crate::tools::query::ExecuteSqlInput;
use crate::tools::schema::ListTablesInput;
use crate::tools::users::{GetUserInput, ListUsersInput};
use rmcp::model::{JsonObject, Tool};
use schemars::{JsonSchema, schema_for};

/// Generate an object schema for a tool input type.
fn input_schema<T: JsonSchema>() -> JsonObject {
    let schema = schema_for!(T);
    let mut object = schema.as_object().cloned().unwrap_or_default();
    object.remove("$schema");
    object.remove("title");
    object
        .entry("properties")
        .or_insert_with(|| JsonObject::new().into());
    object
}

fn description(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::ListTables => "List all tables in the public schema.",
        ToolKind::ExecuteSql => {
            "Query a table through PostgREST.\nSelects columns, applies an optional filter (e.g. \"id=eq.123\"), ordering (e.g. \"created_at.desc\") and row limit.\nDoes not run raw SQL; use execute_migration for that."
        }
        ToolKind::ListUsers => "List users from auth.users (first page, up to `limit` users).",
        ToolKind::GetUser => "Get a single auth user by ID.",
        ToolKind::ExecuteMigration => {
            "Execute a SQL migration through the exec_migration database function."
        }
    }
}

fn schema(kind: ToolKind) -> JsonObject {
    match kind {
        ToolKind::ListTables => input_schema::<ListTablesInput>(),
        ToolKind::ExecuteSql => input_schema::<ExecuteSqlInput>(),
        ToolKind::ListUsers => input_schema::<ListUsersInput>(),
        ToolKind::GetUser => input_schema::<GetUserInput>(),
        ToolKind::ExecuteMigration => input_schema::<ExecuteMigrationInput>(),
    }
}

/// Immutable, ordered list of tool descriptors.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    /// Build the registry, prepending `prefix` to every tool name.
    pub fn new(prefix: &str) -> Self {
        let tools = ToolKind::ALL
            .iter()
            .map(|&kind| ToolDescriptor {
                kind,
                name: format!("{}{}", prefix, kind.base_name()),
                description: description(kind).to_string(),
                input_schema: schema(kind),
            })
            .collect();
        Self { tools }
    }

    /// All descriptors, in listing order.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Descriptors in the rmcp wire model, for `tools/list`.
    pub fn to_mcp_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDescriptor::to_tool).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new("")
    }
}
