//! Tool result envelopes.
//!
//! Every tool answers with a single text content block holding
//! pretty-printed JSON. Failures use the `{error, details}` shape and set
//! `isError`.

use crate::error::{ServerError, ServerResult};
use rmcp::model::{CallToolResult, Content, RawContent};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Pretty-print a JSON payload.
pub fn pretty_json(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Serialize a typed payload into JSON for the envelope.
pub fn to_payload<T: Serialize>(value: &T) -> ServerResult<JsonValue> {
    Ok(serde_json::to_value(value)?)
}

pub fn success_result(payload: &JsonValue) -> CallToolResult {
    CallToolResult::success(vec![Content::text(pretty_json(payload))])
}

pub fn error_result(err: &ServerError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(pretty_json(&err.to_payload()))])
}

/// Text of the first content block, if it is text.
pub fn result_text(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .first()
        .and_then(|c| match &c.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
}
