//! Row counts per cache collection.

use super::connection::CacheDb;
use crate::Error;
use serde::Serialize;

/// Number of rows in each cache collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub searches: u64,
    pub descriptions: u64,
    pub images: u64,
}

impl CacheDb {
    /// Count the rows in each cache collection.
    pub async fn stats(&self) -> Result<CacheStats, Error> {
        self.conn
            .call(|conn| -> Result<CacheStats, Error> {
                let count = |table: &str| -> Result<u64, Error> {
                    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
                    Ok(n as u64)
                };

                Ok(CacheStats {
                    searches: count("search_cache")?,
                    descriptions: count("descriptions")?,
                    images: count("image_cache")?,
                })
            })
            .await
            .map_err(Error::from)
    }
}
