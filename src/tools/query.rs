//! Table query tool.
//!
//! `execute_sql` composes a structured query (select, filter, order, limit)
//! against one table. It never sends raw SQL; use `execute_migration` for that.

use crate::backend::SupabaseBackend;
use crate::error::ServerResult;
use crate::models::{DEFAULT_SELECT, FilterSpec, OrderSpec, TableQuery, ToolKind};
use crate::tools::dispatcher::{ToolContext, deserialize_optional_count, parse_arguments};
use futures_util::future::BoxFuture;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

fn default_select() -> String {
    DEFAULT_SELECT.to_string()
}

/// Input for the execute_sql tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteSqlInput {
    /// Table name
    pub table: String,
    /// Columns to select (e.g. "*" or "id,name,email")
    #[serde(default = "default_select")]
    pub select: String,
    /// PostgREST-style filter (e.g. "id=eq.123")
    #[serde(default)]
    pub filter: Option<String>,
    /// Sort order (e.g. "created_at.desc")
    #[serde(default)]
    pub order: Option<String>,
    /// Maximum number of rows to return
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub limit: Option<u32>,
}

impl ExecuteSqlInput {
    /// Build the table query, parsing filter and order expressions.
    ///
    /// Blank filter and order strings count as absent.
    pub fn to_query(&self) -> ServerResult<TableQuery> {
        let mut query = TableQuery::from(self.table.trim()).select(self.select.as_str());

        if let Some(filter) = self.filter.as_deref().filter(|f| !f.trim().is_empty()) {
            query = query.filter(FilterSpec::parse(filter)?);
        }
        if let Some(order) = self.order.as_deref().filter(|o| !o.trim().is_empty()) {
            query = query.order(OrderSpec::parse(order)?);
        }
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }

        Ok(query)
    }
}

/// Run a filtered query against a table.
pub fn execute_sql<B: SupabaseBackend>(
    ctx: &ToolContext<B>,
    args: JsonObject,
) -> BoxFuture<'_, ServerResult<JsonValue>> {
    Box::pin(async move {
        let input: ExecuteSqlInput = parse_arguments(ToolKind::ExecuteSql, args)?;
        let query = input.to_query()?;
        debug!(table = %query.table, "Executing table query");
        ctx.backend.select(&query).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;
    use crate::models::SortDirection;
    use serde_json::json;

    fn input(value: JsonValue) -> ExecuteSqlInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults() {
        let input = input(json!({"table": "projects"}));
        assert_eq!(input.select, "*");
        let query = input.to_query().unwrap();
        assert_eq!(query, TableQuery::from("projects"));
    }

    #[test]
    fn test_full_input() {
        let query = input(json!({
            "table": "projects",
            "select": "id,name",
            "filter": "id=eq.123",
            "order": "created_at.desc",
            "limit": 5
        }))
        .to_query()
        .unwrap();

        assert_eq!(query.select, "id,name");
        assert_eq!(query.filter, Some(FilterSpec::new("id", "eq", "123")));
        assert_eq!(
            query.order.as_ref().map(|o| o.direction),
            Some(SortDirection::Descending)
        );
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_empty_filter_and_order_are_ignored() {
        for blank in ["", "   ", "\t"] {
            let query = input(json!({"table": "projects", "filter": blank, "order": blank}))
                .to_query()
                .unwrap();
            assert!(query.filter.is_none(), "filter: {:?}", blank);
            assert!(query.order.is_none(), "order: {:?}", blank);
        }
    }

    #[test]
    fn test_limit_accepts_integral_float() {
        let query = input(json!({"table": "projects", "limit": 5.0}))
            .to_query()
            .unwrap();
        assert_eq!(query.limit, Some(5));

        let input = input(json!({"table": "projects", "limit": null}));
        assert_eq!(input.limit, None);
    }

    #[test]
    fn test_limit_rejects_fraction() {
        let result =
            serde_json::from_value::<ExecuteSqlInput>(json!({"table": "projects", "limit": 2.5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_filter_is_rejected() {
        let err = input(json!({"table": "projects", "filter": "id"}))
            .to_query()
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidFilter { .. }));
    }
}
