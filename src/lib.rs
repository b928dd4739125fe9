//! Supabase MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to administer a Supabase project: list tables, query tables through
//! PostgREST, inspect auth users and run SQL migrations.

pub mod backend;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use backend::{SupabaseBackend, SupabaseClient};
pub use config::Config;
pub use error::ServerError;
pub use mcp::SupabaseService;
