//! MCP tool implementations.
//!
//! Tool functions are generic over the table store and pedigree source so
//! they can be exercised against in-memory fakes.

pub mod cache;
pub mod labels;
pub mod pedigree_search;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::ToolError;

pub use cache::{CacheClearParams, CacheQueryParams, clear_impl, query_impl};
pub use labels::{PositionLabelsParams, labels_impl};
pub use pedigree_search::{SearchDayParams, SearchRaceParams, search_day_impl, search_race_impl};

/// Serialize `output` as the pretty-printed text content of a tool result.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(|e| ToolError::Serialize(e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
pub(crate) fn result_json(result: &CallToolResult) -> serde_json::Value {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
