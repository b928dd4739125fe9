//! Compact filter and order expressions.
//!
//! Tools accept PostgREST-style shorthand strings:
//! - filter: `column=operator.value` (or `column.operator.value`)
//! - order: `column.direction`
//!
//! Both are parsed into typed specs before any request is built.

use crate::error::{ServerError, ServerResult};
use std::fmt;
use std::str::FromStr;

/// Query parameters the table query sets itself; a filter may not reuse them.
pub const RESERVED_COLUMNS: &[&str] = &["select", "order", "limit"];

/// A single row predicate: `(column, operator, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub column: String,
    pub operator: String,
    /// Everything after the operator, kept intact (`1.5`, `eq.done`, `(1,2,3)`).
    pub value: String,
}

impl FilterSpec {
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Parse a filter expression.
    ///
    /// The column ends at the first `=` or `.`, the operator at the next `.`.
    /// A missing value is allowed and becomes the empty string; a missing
    /// column or operator, or a column named after a reserved query
    /// parameter, is rejected.
    pub fn parse(input: &str) -> ServerResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ServerError::invalid_filter(input, "filter is empty"));
        }

        let Some(split) = trimmed.find(['=', '.']) else {
            return Err(ServerError::invalid_filter(input, "missing operator"));
        };
        let column = trimmed[..split].trim();
        let rest = &trimmed[split + 1..];

        if column.is_empty() {
            return Err(ServerError::invalid_filter(input, "missing column"));
        }
        if RESERVED_COLUMNS.contains(&column) {
            return Err(ServerError::invalid_filter(
                input,
                format!(
                    "'{}' is a reserved query parameter, use the {} argument",
                    column, column
                ),
            ));
        }

        let (operator, value) = match rest.split_once('.') {
            Some((op, value)) => (op, value),
            None => (rest, ""),
        };

        if operator.is_empty() {
            return Err(ServerError::invalid_filter(input, "missing operator"));
        }
        if !operator
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ServerError::invalid_filter(
                input,
                format!("operator '{}' contains invalid characters", operator),
            ));
        }

        Ok(Self::new(column, operator, value))
    }

    /// Query parameter value in PostgREST form: `operator.value`.
    pub fn param_value(&self) -> String {
        format!("{}.{}", self.operator, self.value)
    }
}

impl FromStr for FilterSpec {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering of query results: `(column, direction)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderSpec {
    /// Parse an order expression.
    ///
    /// Only a direction of exactly `desc` sorts descending; an absent or
    /// unrecognized direction sorts ascending.
    pub fn parse(input: &str) -> ServerResult<Self> {
        let trimmed = input.trim();
        let (column, direction) = match trimmed.split_once('.') {
            Some((column, direction)) => (column.trim(), Some(direction)),
            None => (trimmed, None),
        };

        if column.is_empty() {
            return Err(ServerError::invalid_order(input, "missing column"));
        }

        let direction = match direction {
            Some("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };

        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }

    /// Query parameter value in PostgREST form: `column.asc` / `column.desc`.
    pub fn param_value(&self) -> String {
        format!("{}.{}", self.column, self.direction)
    }
}

impl FromStr for OrderSpec {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
