//! Tool-level errors for the ketto MCP server.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Errors raised by tool handlers before or after calling into the core.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid tool parameters (e.g., unknown venue).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Output could not be serialized.
    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(String),
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let (code, message) = match &err {
            ToolError::InvalidInput(msg) => (-32602, msg.clone()),
            ToolError::Serialize(msg) => (-32603, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_codes() {
        let err: McpError = ToolError::InvalidInput("bad venue".into()).into();
        assert_eq!(err.code.0, -32602);
        let err: McpError = ToolError::Serialize("oops".into()).into();
        assert_eq!(err.code.0, -32603);
    }
}
