//! Work description lookup with a persistent cache.

use std::sync::Arc;

use shelf_core::CacheDb;

use super::{BookSource, CatalogError};

/// Resolves work ids to synopses, fetching each work at most once.
#[derive(Clone)]
pub struct DescriptionFetcher {
    db: CacheDb,
    source: Arc<dyn BookSource>,
}

impl DescriptionFetcher {
    pub fn new(db: CacheDb, source: Arc<dyn BookSource>) -> Self {
        Self { db, source }
    }

    /// Cached description for `work_id`, fetched and cached on first use.
    ///
    /// An empty string is a real, cached answer ("upstream has none") and is
    /// never refetched. Upstream failures propagate without caching anything.
    pub async fn get_description(&self, work_id: &str) -> Result<String, CatalogError> {
        if work_id.is_empty() {
            return Ok(String::new());
        }

        if let Some(cached) = self.db.find_description(work_id).await? {
            tracing::debug!(work_id, "description cache hit");
            return Ok(cached);
        }

        let description = self.source.work(work_id).await?.description_text();

        if let Err(e) = self.db.insert_description(work_id, &description).await {
            tracing::warn!(work_id, error = %e, "failed to cache description");
        }

        Ok(description)
    }
}
