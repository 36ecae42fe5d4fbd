//! Unified error types for shelf.
//!
//! Every variant carries a stable code prefix so the outer surface can map it
//! onto a numeric MCP error code.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the shelf services.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query, page 0).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// A write collided with a uniqueness constraint.
    #[error("CACHE_ERROR: duplicate key: {0}")]
    DuplicateKey(String),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored document could not be encoded or decoded.
    #[error("CACHE_ERROR: corrupt cache document: {0}")]
    CorruptDocument(String),

    /// Upstream request timed out.
    #[error("UPSTREAM_TIMEOUT: {0}")]
    UpstreamTimeout(String),

    /// Upstream network failure or non-success status.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Upstream returned a body that could not be parsed.
    #[error("UPSTREAM_PARSE: {0}")]
    UpstreamParse(String),

    /// Local file storage failed.
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
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
        if is_unique_violation(&err) {
            Error::DuplicateKey(err.to_string())
        } else {
            Error::Database(tokio_rusqlite::Error::Error(err))
        }
    }
}

/// Whether a SQLite failure is a UNIQUE or PRIMARY KEY constraint violation.
///
/// Covers both row writes and `CREATE UNIQUE INDEX` over rows that already
/// collide.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::CorruptDocument(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::DuplicateKey(msg) => (-32002, msg.clone()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::CorruptDocument(msg) => (-32002, msg.clone()),
            Error::UpstreamTimeout(msg) => (-32006, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::UpstreamParse(msg) => (-32013, msg.clone()),
            Error::Io(e) => (-32014, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
