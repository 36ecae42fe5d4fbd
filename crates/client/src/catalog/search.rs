//! Search orchestration: cache lookup, upstream search, enrichment.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use shelf_core::sanitize::normalize;
use shelf_core::{AppConfig, BookSummary, CacheDb, NO_DESCRIPTION, ResultSet, SearchKey, UNKNOWN_TITLE};

use super::{BookSource, CatalogError, DescriptionFetcher, ImageCache};
use crate::openlibrary::{OpenLibraryClient, OpenLibraryConfig, SearchDoc};

/// Fields taken from one search hit before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub work_id: String,
    pub title: String,
    pub author_first: String,
    pub author_last: String,
    pub first_publish_year: Option<i32>,
    pub genre: String,
    pub cover_id: Option<String>,
}

impl From<&SearchDoc> for BookDraft {
    fn from(doc: &SearchDoc) -> Self {
        let (author_first, author_last) = doc.author_tokens();
        Self {
            work_id: doc.work_id().to_string(),
            title: doc.title().unwrap_or(UNKNOWN_TITLE).to_string(),
            author_first: author_first.to_string(),
            author_last: author_last.to_string(),
            first_publish_year: doc.first_publish_year,
            genre: doc.genre().to_string(),
            cover_id: doc.cover_id(),
        }
    }
}

impl BookDraft {
    /// Attach the synopsis and image reference.
    ///
    /// An empty synopsis is reported as [`NO_DESCRIPTION`].
    pub fn finish(self, synopsis: String, image: String) -> BookSummary {
        BookSummary {
            work_id: self.work_id,
            title: self.title,
            synopsis: if synopsis.is_empty() { NO_DESCRIPTION.to_string() } else { synopsis },
            first_publish_year: self.first_publish_year,
            author_first: self.author_first,
            author_last: self.author_last,
            genre: self.genre,
            image,
        }
    }
}

/// Cached, enriched book search.
#[derive(Clone)]
pub struct Catalog {
    db: CacheDb,
    source: Arc<dyn BookSource>,
    descriptions: DescriptionFetcher,
    images: ImageCache,
}

impl Catalog {
    pub fn new(db: CacheDb, source: Arc<dyn BookSource>, image_dir: impl Into<PathBuf>, image_route: &str) -> Self {
        let descriptions = DescriptionFetcher::new(db.clone(), source.clone());
        let images = ImageCache::new(db.clone(), source.clone(), image_dir, image_route);
        Self { db, source, descriptions, images }
    }

    /// Build a catalog over the Open Library client described by `config`.
    pub fn from_config(db: CacheDb, config: &AppConfig) -> Result<Self, CatalogError> {
        let client = OpenLibraryClient::new(OpenLibraryConfig::from(config))?;
        Ok(Self::new(db, Arc::new(client), &config.image_dir, &config.image_route))
    }

    /// One page of enriched results for `query`.
    ///
    /// Served from the search cache when present. Otherwise the upstream
    /// search runs once, every hit's description and cover are resolved
    /// concurrently, and the composed set is cached before it is returned.
    ///
    /// Only an upstream search failure or invalid input is an error.
    pub async fn search(&self, query: &str, page: u32) -> Result<ResultSet, CatalogError> {
        if page == 0 {
            return Err(CatalogError::InvalidInput("page must be at least 1".into()));
        }
        let sanitized = normalize(query);
        if sanitized.is_empty() {
            return Err(CatalogError::InvalidInput("query must not be empty".into()));
        }

        let key = SearchKey::new(query, page);
        match self.db.find_search(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(title = %key.title, page, "search cache hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(title = %key.title, page, error = %e, "search cache read failed"),
        }

        let start = Instant::now();
        let docs = self.source.search(&sanitized, page).await?;
        let drafts: Vec<BookDraft> = docs.docs.iter().map(BookDraft::from).collect();

        let descriptions = join_all(drafts.iter().map(|draft| self.describe(&draft.work_id)));
        let images = self.images.resolve_batch(drafts.iter().map(|draft| draft.cover_id.clone()));
        let (synopses, images) = tokio::join!(descriptions, images);

        let results = drafts
            .into_iter()
            .zip(synopses)
            .map(|(draft, synopsis)| {
                let image = draft
                    .cover_id
                    .as_ref()
                    .and_then(|id| images.get(id).cloned())
                    .unwrap_or_default();
                draft.finish(synopsis, image)
            })
            .collect::<Vec<_>>();

        let result_set = ResultSet { count: docs.num_found, results };

        match self.db.insert_search(&key, &result_set).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!(title = %key.title, page, "search already cached by a concurrent request"),
            Err(e) => tracing::warn!(title = %key.title, page, error = %e, "failed to cache search"),
        }

        tracing::info!(
            title = %key.title,
            page,
            count = result_set.count,
            returned = result_set.results.len(),
            "search composed in {:?}",
            start.elapsed()
        );
        Ok(result_set)
    }

    /// Description for one hit, empty on failure.
    async fn describe(&self, work_id: &str) -> String {
        match self.descriptions.get_description(work_id).await {
            Ok(description) => description,
            Err(e) => {
                tracing::warn!(work_id, error = %e, "description unavailable");
                String::new()
            }
        }
    }
}
