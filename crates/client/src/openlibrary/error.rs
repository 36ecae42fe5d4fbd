//! Open Library client error types.

use std::sync::Arc;

/// Errors from the Open Library APIs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpenLibraryError {
    /// A configured endpoint or a derived request URL is not usable.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for OpenLibraryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { OpenLibraryError::Timeout } else { OpenLibraryError::Network(Arc::new(err)) }
    }
}

impl From<OpenLibraryError> for shelf_core::Error {
    fn from(err: OpenLibraryError) -> Self {
        match err {
            OpenLibraryError::Timeout => shelf_core::Error::UpstreamTimeout(err.to_string()),
            OpenLibraryError::Parse(msg) => shelf_core::Error::UpstreamParse(msg),
            OpenLibraryError::HttpError { status } => shelf_core::Error::HttpError(format!("HTTP {status}")),
            OpenLibraryError::Network(_) | OpenLibraryError::InvalidUrl(_) => {
                shelf_core::Error::HttpError(err.to_string())
            }
        }
    }
}
