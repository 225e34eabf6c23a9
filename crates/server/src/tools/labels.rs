//! position_labels tool implementation.
//!
//! Lists pedigree position labels in slot order, so callers can read the
//! `matched_positions` column.

use ketto_core::PositionIndex;
use ketto_core::pedigree::PEDIGREE_DEPTH;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::error::ToolError;

/// Parameters for the position_labels tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PositionLabelsParams {
    /// Generations to list, 1 to 5 (default: 5).
    pub depth: Option<usize>,
}

/// One label and its slot in the pedigree table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LabelEntry {
    pub slot: usize,
    pub label: String,
    pub generation: usize,
}

/// Implementation of the position_labels tool.
pub fn labels_impl(params: PositionLabelsParams) -> Result<CallToolResult, McpError> {
    let depth = params.depth.unwrap_or(PEDIGREE_DEPTH);
    if !(1..=PEDIGREE_DEPTH).contains(&depth) {
        return Err(ToolError::InvalidInput(format!("depth must be between 1 and {PEDIGREE_DEPTH}")).into());
    }

    let index = PositionIndex::generate(depth);
    let labels: Vec<LabelEntry> = index
        .labels()
        .iter()
        .enumerate()
        .map(|(slot, label)| LabelEntry { slot, label: label.to_string(), generation: label.depth() })
        .collect();
    json_result(&labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::result_json;

    #[test]
    fn test_default_depth_lists_62_labels() {
        let output = result_json(&labels_impl(PositionLabelsParams::default()).unwrap());
        let labels = output.as_array().unwrap();
        assert_eq!(labels.len(), 62);
        assert_eq!(labels[0]["label"], "父");
        assert_eq!(labels[1]["label"], "父父");
        assert_eq!(labels[61]["label"], "母母母母母");
        assert_eq!(labels[61]["generation"], 5);
    }

    #[test]
    fn test_depth_bounds() {
        assert!(labels_impl(PositionLabelsParams { depth: Some(0) }).is_err());
        assert!(labels_impl(PositionLabelsParams { depth: Some(6) }).is_err());
        let output = result_json(&labels_impl(PositionLabelsParams { depth: Some(2) }).unwrap());
        assert_eq!(output.as_array().unwrap().len(), 6);
    }
}
