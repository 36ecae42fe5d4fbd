//! Cover image cache backed by local files.
//!
//! Lookup order for a cover id:
//!
//! 1. `<image_dir>/<id>.jpg` on disk
//! 2. a metadata row whose `local_path` still exists
//! 3. download, write, record metadata
//!
//! Any failure along the way resolves to the origin URL instead of an error.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::join_all;
use shelf_core::{CacheDb, ImageRecord};

use super::{BookSource, CatalogError};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Resolves cover ids to image references.
#[derive(Clone)]
pub struct ImageCache {
    db: CacheDb,
    source: Arc<dyn BookSource>,
    image_dir: PathBuf,
    image_route: String,
}

impl ImageCache {
    /// `image_route` is the public path prefix the outer layer serves
    /// `image_dir` under. A trailing `/` is dropped.
    pub fn new(db: CacheDb, source: Arc<dyn BookSource>, image_dir: impl Into<PathBuf>, image_route: &str) -> Self {
        Self { db, source, image_dir: image_dir.into(), image_route: image_route.trim_end_matches('/').to_string() }
    }

    /// Image reference for a cover: a local route, the origin URL when the
    /// cover could not be stored, or empty when there is no cover.
    pub async fn resolve(&self, cover_id: Option<&str>) -> String {
        let Some(cover_id) = cover_id.filter(|id| !id.is_empty()) else {
            return String::new();
        };

        match self.try_resolve(cover_id).await {
            Ok(reference) => reference,
            Err(e) => {
                tracing::warn!(cover_id, error = %e, "cover unavailable, using origin url");
                self.source.cover_url(cover_id)
            }
        }
    }

    /// Resolve every non-empty id concurrently. Duplicates are resolved once.
    ///
    /// The map holds exactly the valid ids.
    pub async fn resolve_batch<I>(&self, cover_ids: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let ids: BTreeSet<String> = cover_ids.into_iter().flatten().filter(|id| !id.is_empty()).collect();

        let resolved = join_all(ids.iter().map(|id| self.resolve(Some(id.as_str())))).await;
        ids.into_iter().zip(resolved).collect()
    }

    /// Resolve one cover, surfacing the reason when it can't be stored.
    async fn try_resolve(&self, cover_id: &str) -> Result<String, CatalogError> {
        if !is_valid_cover_id(cover_id) {
            return Err(CatalogError::InvalidInput(format!("cover id {cover_id:?}")));
        }

        let path = self.local_path(cover_id);
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(cover_id, "cover found on disk");
            return Ok(self.route(cover_id));
        }

        match self.db.find_image(cover_id).await {
            Ok(Some(record)) => {
                if tokio::fs::try_exists(&record.local_path).await.unwrap_or(false) {
                    return Ok(self.route(cover_id));
                }
                tracing::debug!(cover_id, path = %record.local_path, "cover metadata is stale");
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(cover_id, error = %e, "image metadata lookup failed"),
        }

        let bytes = self.source.cover(cover_id).await?;
        self.write_atomic(&path, &bytes).await?;

        let record = ImageRecord {
            cover_id: cover_id.to_string(),
            local_path: path.to_string_lossy().into_owned(),
            original_url: self.source.cover_url(cover_id),
            size_bytes: bytes.len() as u64,
        };
        if let Err(e) = self.db.put_image(&record).await {
            tracing::warn!(cover_id, error = %e, "failed to record image metadata");
        }

        tracing::debug!(cover_id, size = bytes.len(), "cover cached");
        Ok(self.route(cover_id))
    }

    fn local_path(&self, cover_id: &str) -> PathBuf {
        self.image_dir.join(format!("{cover_id}.jpg"))
    }

    fn route(&self, cover_id: &str) -> String {
        format!("{}/{}.jpg", self.image_route, cover_id)
    }

    /// Write to a sibling temp file, then rename into place so readers never
    /// see a partial image.
    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), CatalogError> {
        tokio::fs::create_dir_all(&self.image_dir).await?;

        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp = path.with_extension(format!("jpg.part-{}-{}", std::process::id(), seq));

        if let Err(e) = tokio::fs::write(&temp, bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&temp, path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Cover ids become file names, so only plain alphanumerics are accepted.
fn is_valid_cover_id(cover_id: &str) -> bool {
    !cover_id.is_empty() && cover_id.chars().all(|c| c.is_ascii_alphanumeric())
}
