//! Search cache operations.
//!
//! Composed result sets are stored as JSON documents under a (title, page)
//! key. Entries are write-once: there is no update path and no expiry.

use super::connection::CacheDb;
use crate::books::ResultSet;
use crate::sanitize::cache_title;
use crate::Error;
use chrono::Utc;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Composite search cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    /// Lower-cased raw query (not the `+`-joined upstream form).
    pub title: String,
    pub page: u32,
}

impl SearchKey {
    pub fn new(raw_query: &str, page: u32) -> Self {
        Self { title: cache_title(raw_query), page }
    }
}

impl CacheDb {
    /// Get a cached result set by key.
    ///
    /// Returns None if the key doesn't exist in the cache. When duplicates
    /// exist (no unique index yet), the most recently written row wins.
    pub async fn find_search(&self, key: &SearchKey) -> Result<Option<ResultSet>, Error> {
        let SearchKey { title, page } = key.clone();
        self.conn
            .call(move |conn| -> Result<Option<ResultSet>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT data FROM search_cache WHERE title = ?1 AND page = ?2 ORDER BY id DESC LIMIT 1",
                )?;

                let result = stmt.query_row(params![title, page], |row| row.get::<_, String>(0));

                match result {
                    Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert a composed result set.
    ///
    /// Returns `false` when another writer already cached this key; the
    /// existing entry is left untouched.
    pub async fn insert_search(&self, key: &SearchKey, data: &ResultSet) -> Result<bool, Error> {
        let SearchKey { title, page } = key.clone();
        let data = serde_json::to_string(data)?;
        let created_at = Utc::now().to_rfc3339();

        let result = self
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO search_cache (title, page, data, created_at) VALUES (?1, ?2, ?3, ?4)",
                    params![title, page, data, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from);

        match result {
            Ok(()) => Ok(true),
            Err(Error::DuplicateKey(msg)) => {
                tracing::debug!(title = %key.title, page = key.page, "search already cached: {}", msg);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
