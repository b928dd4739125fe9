//! Data models for the Supabase MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod filter;
pub mod query;
pub mod tool;
pub mod user;

// Re-export commonly used types
pub use filter::{FilterSpec, OrderSpec, SortDirection};
pub use query::{DEFAULT_SELECT, TableQuery};
pub use tool::{ToolDescriptor, ToolKind};
pub use user::{DEFAULT_USERS_PER_PAGE, Pagination, UsersPage, UsersResponse};
