//! Unified error types for ketto.
//!
//! Display strings carry a stable `CODE:` prefix so callers and MCP clients can
//! tell transport failures apart from store and schema failures.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the pedigree search core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty target name).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Race identifier could not be parsed.
    #[error("INVALID_RACE_ID: {0}")]
    InvalidRaceId(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Row index outside the table.
    #[error("STORE_ERROR: row {index} out of range (table has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Existing header row disagrees with the cache schema.
    #[error("SCHEMA_MISMATCH: expected header {expected:?}, found {found:?}")]
    SchemaMismatch { expected: Vec<String>, found: Vec<String> },

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}

impl Error {
    /// Whether the error came from the scraping transport rather than the store.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::InvalidUrl(_) | Error::FetchTimeout(_) | Error::FetchTooLarge(_) | Error::HttpError(_)
        )
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidRaceId(msg) => (-32602, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::RowOutOfRange { .. } => (-32002, err.to_string()),
            Error::SchemaMismatch { .. } => (-32013, err.to_string()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::FetchTimeout(msg) => (-32006, msg.clone()),
            Error::FetchTooLarge(msg) => (-32007, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidRaceId("20250502".to_string());
        assert!(err.to_string().contains("INVALID_RACE_ID"));
        assert!(err.to_string().contains("20250502"));
    }

    #[test]
    fn test_schema_mismatch_display() {
        let err = Error::SchemaMismatch { expected: vec!["馬名".into()], found: vec!["name".into()] };
        assert!(err.to_string().starts_with("SCHEMA_MISMATCH"));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::HttpError("status 503".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32008);
    }

    #[test]
    fn test_is_transport() {
        assert!(Error::FetchTimeout("slow".into()).is_transport());
        assert!(!Error::MigrationFailed("bad".into()).is_transport());
        assert!(!Error::RowOutOfRange { index: 3, len: 1 }.is_transport());
    }
}
