//! Description cache operations.

use super::connection::CacheDb;
use crate::Error;
use chrono::Utc;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl CacheDb {
    /// Get a cached description by work id.
    ///
    /// `Some("")` means the work was fetched and has no description; `None`
    /// means it has never been fetched.
    pub async fn find_description(&self, work_id: &str) -> Result<Option<String>, Error> {
        let work_id = work_id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row(
                    "SELECT description FROM descriptions WHERE work_id = ?1 ORDER BY id DESC LIMIT 1",
                    params![work_id],
                    |row| row.get(0),
                );

                match result {
                    Ok(description) => Ok(Some(description)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Cache a description. The empty string is a valid value.
    ///
    /// Returns `false` when the work id was already cached by another writer.
    pub async fn insert_description(&self, work_id: &str, description: &str) -> Result<bool, Error> {
        let owned_id = work_id.to_string();
        let description = description.to_string();
        let created_at = Utc::now().to_rfc3339();

        let result = self
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO descriptions (work_id, description, created_at) VALUES (?1, ?2, ?3)",
                    params![owned_id, description, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from);

        match result {
            Ok(()) => Ok(true),
            Err(Error::DuplicateKey(_)) => {
                tracing::debug!(work_id, "description already cached");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
