//! MCP server integration module.
//!
//! This module provides the integration between the MCP protocol and
//! the Supabase tool dispatcher using the rmcp framework.

pub mod service;

pub use service::SupabaseService;
