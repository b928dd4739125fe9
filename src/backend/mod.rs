//! Supabase API access layer.
//!
//! This module provides:
//! - The `SupabaseBackend` trait: the API surface the tools consume
//!   (table queries, remote procedure calls, auth user administration)
//! - `SupabaseClient`: the HTTP implementation talking to PostgREST and GoTrue

pub mod client;

pub use client::SupabaseClient;

use crate::error::ServerResult;
use crate::models::{TableQuery, UsersPage};
use serde_json::Value as JsonValue;
use std::future::Future;

/// Operations the tool handlers need from a Supabase project.
///
/// Any error the API reports is returned as `ServerError::Upstream`.
pub trait SupabaseBackend: Send + Sync + 'static {
    /// Run a structured table query and return the rows.
    fn select(&self, query: &TableQuery) -> impl Future<Output = ServerResult<JsonValue>> + Send;

    /// Call a database function by name with named parameters.
    fn rpc(
        &self,
        function: &str,
        params: JsonValue,
    ) -> impl Future<Output = ServerResult<JsonValue>> + Send;

    /// List auth users, one page at a time (pages start at 1).
    fn list_users(
        &self,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = ServerResult<UsersPage>> + Send;

    /// Fetch one auth user by id.
    fn get_user(&self, user_id: &str) -> impl Future<Output = ServerResult<JsonValue>> + Send;
}
