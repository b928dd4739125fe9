//! MCP tool implementations.
//!
//! This module contains the tool registry, the dispatcher and one handler
//! module per tool family:
//! - `schema`: `list_tables`
//! - `query`: `execute_sql` (structured PostgREST table queries)
//! - `users`: `list_users`, `get_user`
//! - `migration`: `execute_migration`

pub mod dispatcher;
pub mod format;
pub mod migration;
pub mod query;
pub mod registry;
pub mod schema;
pub mod users;

pub use dispatcher::{Dispatcher, ToolContext, ToolHandler, default_handlers};
pub use migration::{ExecuteMigrationInput, ExecuteMigrationOutput};
pub use query::ExecuteSqlInput;
pub use registry::ToolRegistry;
pub use schema::ListTablesInput;
pub use users::{GetUserInput, ListUsersInput};
