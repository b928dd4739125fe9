//! Structured table queries.
//!
//! A `TableQuery` is what `execute_sql` builds from its arguments: a table,
//! a column selection, and optional filter, order and limit. It renders to
//! PostgREST query parameters.

use crate::models::filter::{FilterSpec, OrderSpec};

/// Default column selection.
pub const DEFAULT_SELECT: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: String,
    pub select: String,
    pub filter: Option<FilterSpec>,
    pub order: Option<OrderSpec>,
    pub limit: Option<u32>,
}

impl TableQuery {
    /// Start a query selecting every column of `table`.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: DEFAULT_SELECT.to_string(),
            filter: None,
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = columns.into();
        self
    }

    pub fn filter(mut self, filter: FilterSpec) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order(mut self, order: OrderSpec) -> Self {
        self.order = Some(order);
        self
    }

    /// Cap the row count. A limit of 0 leaves the query unbounded.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Render as PostgREST query parameters, in a stable order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), clean_select(&self.select))];

        if let Some(filter) = &self.filter {
            params.push((filter.column.clone(), filter.param_value()));
        }
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.param_value()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

/// Strip whitespace outside double-quoted identifiers.
///
/// `"id, name"` becomes `"id,name"`; an empty selection falls back to `*`.
pub fn clean_select(select: &str) -> String {
    let mut quoted = false;
    let cleaned: String = select
        .chars()
        .filter(|c| {
            if *c == '"' {
                quoted = !quoted;
            }
            quoted || !c.is_whitespace()
        })
        .collect();

    if cleaned.is_empty() {
        DEFAULT_SELECT.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_default_query_selects_everything() {
        let params = TableQuery::from("projects").to_params();
        assert_eq!(params, vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn test_full_query_params() {
        let query = TableQuery::from("projects")
            .select("id, name")
            .filter(FilterSpec::parse("id=eq.123").unwrap())
            .order(OrderSpec::parse("created_at.desc").unwrap())
            .limit(5);
        let params = query.to_params();

        assert_eq!(param(&params, "select"), Some("id,name"));
        assert_eq!(param(&params, "id"), Some("eq.123"));
        assert_eq!(param(&params, "order"), Some("created_at.desc"));
        assert_eq!(param(&params, "limit"), Some("5"));
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let query = TableQuery::from("projects").limit(0);
        assert_eq!(query.limit, None);
        assert_eq!(param(&query.to_params(), "limit"), None);
    }

    #[test]
    fn test_clean_select_keeps_quoted_whitespace() {
        assert_eq!(clean_select("id, \"full name\" , email"), "id,\"full name\",email");
        assert_eq!(clean_select("  "), "*");
        assert_eq!(clean_select("*"), "*");
    }
}
