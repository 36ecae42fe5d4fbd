//! Cached book search with concurrent enrichment.
//!
//! ### Layers
//!
//! - [`Catalog`] answers `(query, page)` from the search cache or composes a
//!   fresh result set from upstream.
//! - [`DescriptionFetcher`] caches synopses by work id.
//! - [`ImageCache`] keeps cover images on local disk, keyed by cover id.
//!
//! All three read and write only through [`CacheDb`](shelf_core::CacheDb); there is no in-process
//! caching, so state survives restarts and is shared by every worker.
//!
//! ### Failure isolation
//!
//! Only a failure of the primary upstream search reaches the caller. A failed
//! description becomes the "no description" placeholder and a failed cover
//! becomes its origin URL.

pub mod descriptions;
pub mod images;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use descriptions::DescriptionFetcher;
pub use images::ImageCache;
pub use search::{BookDraft, Catalog};

use async_trait::async_trait;
use bytes::Bytes;

use crate::openlibrary::{OpenLibraryError, SearchDocs, WorkRecord};

/// Upstream book data the catalog composes results from.
#[async_trait]
pub trait BookSource: Send + Sync {
    /// One page of search hits for an already sanitized query.
    async fn search(&self, query: &str, page: u32) -> Result<SearchDocs, OpenLibraryError>;

    /// The work record for a work id.
    async fn work(&self, work_id: &str) -> Result<WorkRecord, OpenLibraryError>;

    /// Cover image bytes.
    async fn cover(&self, cover_id: &str) -> Result<Bytes, OpenLibraryError>;

    /// Origin URL for a cover, used as the fallback image reference.
    fn cover_url(&self, cover_id: &str) -> String;
}

/// Errors from the catalog services.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("upstream: {0}")]
    Upstream(#[from] OpenLibraryError),

    #[error("store: {0}")]
    Store(#[from] shelf_core::Error),

    #[error("image storage: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CatalogError> for shelf_core::Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidInput(msg) => shelf_core::Error::InvalidInput(msg),
            CatalogError::Upstream(e) => e.into(),
            CatalogError::Store(e) => e,
            CatalogError::Io(e) => shelf_core::Error::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_into_core() {
        let err: shelf_core::Error = CatalogError::InvalidInput("page must be at least 1".into()).into();
        assert!(matches!(err, shelf_core::Error::InvalidInput(_)));

        let err: shelf_core::Error = CatalogError::Upstream(OpenLibraryError::Timeout).into();
        assert!(matches!(err, shelf_core::Error::UpstreamTimeout(_)));
    }
}
