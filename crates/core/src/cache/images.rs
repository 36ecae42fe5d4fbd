//! Image cache metadata operations.
//!
//! A row here only records where a cover was written. The file on disk is
//! authoritative; callers must check it still exists before trusting a row.

use super::connection::CacheDb;
use crate::Error;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Metadata for one cached cover image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub cover_id: String,
    /// Filesystem path the bytes were written to.
    pub local_path: String,
    /// Upstream URL the bytes were downloaded from.
    pub original_url: String,
    pub size_bytes: u64,
}

impl CacheDb {
    /// Get image metadata by cover id.
    pub async fn find_image(&self, cover_id: &str) -> Result<Option<ImageRecord>, Error> {
        let cover_id = cover_id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<ImageRecord>, Error> {
                let result = conn.query_row(
                    "SELECT cover_id, local_path, original_url, size_bytes
                     FROM image_cache WHERE cover_id = ?1 ORDER BY id DESC LIMIT 1",
                    params![cover_id],
                    |row| {
                        Ok(ImageRecord {
                            cover_id: row.get(0)?,
                            local_path: row.get(1)?,
                            original_url: row.get(2)?,
                            size_bytes: row.get::<_, i64>(3)? as u64,
                        })
                    },
                );

                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Record image metadata.
    ///
    /// A stale row for the same cover id (file since deleted) is refreshed in
    /// place; otherwise a new row is inserted. Losing an insert race to a
    /// concurrent writer is not an error.
    pub async fn put_image(&self, record: &ImageRecord) -> Result<(), Error> {
        let record = record.clone();
        let cover_id = record.cover_id.clone();
        let created_at = Utc::now().to_rfc3339();

        let result = self
            .conn
            .call(move |conn| -> Result<(), Error> {
                let updated = conn.execute(
                    "UPDATE image_cache SET local_path = ?2, original_url = ?3, size_bytes = ?4
                     WHERE cover_id = ?1",
                    params![record.cover_id, record.local_path, record.original_url, record.size_bytes as i64],
                )?;

                if updated == 0 {
                    conn.execute(
                        "INSERT INTO image_cache (cover_id, local_path, original_url, size_bytes, created_at)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        params![
                            record.cover_id,
                            record.local_path,
                            record.original_url,
                            record.size_bytes as i64,
                            created_at
                        ],
                    )?;
                }
                Ok(())
            })
            .await
            .map_err(Error::from);

        match result {
            Err(Error::DuplicateKey(_)) => {
                tracing::debug!(cover_id = %cover_id, "image metadata already cached");
                Ok(())
            }
            other => other,
        }
    }
}
