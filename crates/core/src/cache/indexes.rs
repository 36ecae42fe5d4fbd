//! Startup index bootstrap and duplicate repair.
//!
//! Every index is created independently: a failure on one is logged and
//! recorded in the [`BootstrapReport`] without stopping the others. The search
//! cache unique index has one repair path for rows that already violate it.

use super::connection::CacheDb;
use crate::Error;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// An index the store maintains.
#[derive(Debug, Clone, Copy)]
struct IndexSpec {
    name: &'static str,
    sql: &'static str,
}

const SEARCH_CACHE_INDEX: IndexSpec = IndexSpec {
    name: "idx_search_cache_title_page",
    sql: "CREATE UNIQUE INDEX IF NOT EXISTS idx_search_cache_title_page ON search_cache (title, page)",
};

const OTHER_INDEXES: &[IndexSpec] = &[
    IndexSpec {
        name: "idx_descriptions_work_id",
        sql: "CREATE UNIQUE INDEX IF NOT EXISTS idx_descriptions_work_id ON descriptions (work_id)",
    },
    IndexSpec {
        name: "idx_users_uname",
        sql: "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_uname ON users (uname)",
    },
    IndexSpec {
        name: "idx_collections_uid",
        sql: "CREATE INDEX IF NOT EXISTS idx_collections_uid ON collections (uid)",
    },
    IndexSpec {
        name: "idx_image_cache_cover_id",
        sql: "CREATE UNIQUE INDEX IF NOT EXISTS idx_image_cache_cover_id ON image_cache (cover_id)",
    },
];

/// Outcome of [`CacheDb::initialize_indexes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Indexes that exist after bootstrap.
    pub created: Vec<&'static str>,
    /// Indexes that could not be created, with the reason.
    pub failed: Vec<(&'static str, String)>,
    /// Set when duplicate search cache rows had to be collapsed.
    pub repaired: Option<RepairSummary>,
}

impl BootstrapReport {
    /// True when every index was created.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of collapsing duplicate search cache rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairSummary {
    /// Rows present before the repair.
    pub scanned: usize,
    /// Rows kept, one per (title, page).
    pub kept: usize,
}

impl CacheDb {
    /// Establish every cache and account index.
    ///
    /// Idempotent; safe to call on every startup. Never fails as a whole: per
    /// index failures are logged and reported.
    pub async fn initialize_indexes(&self) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        match self.create_index(SEARCH_CACHE_INDEX).await {
            Ok(()) => report.created.push(SEARCH_CACHE_INDEX.name),
            Err(Error::DuplicateKey(reason)) => {
                tracing::info!(index = SEARCH_CACHE_INDEX.name, %reason, "collapsing duplicate search_cache rows");
                match self.repair_search_cache().await {
                    Ok(summary) => {
                        report.repaired = Some(summary);
                        match self.create_index(SEARCH_CACHE_INDEX).await {
                            Ok(()) => {
                                tracing::info!(
                                    scanned = summary.scanned,
                                    kept = summary.kept,
                                    "search_cache index created after cleanup"
                                );
                                report.created.push(SEARCH_CACHE_INDEX.name);
                            }
                            Err(e) => record_failure(&mut report, SEARCH_CACHE_INDEX, &e),
                        }
                    }
                    Err(e) => record_failure(&mut report, SEARCH_CACHE_INDEX, &e),
                }
            }
            Err(e) => record_failure(&mut report, SEARCH_CACHE_INDEX, &e),
        }

        for spec in OTHER_INDEXES {
            match self.create_index(*spec).await {
                Ok(()) => report.created.push(spec.name),
                Err(e) => record_failure(&mut report, *spec, &e),
            }
        }

        tracing::info!(
            created = report.created.len(),
            failed = report.failed.len(),
            repaired = report.repaired.is_some(),
            "database indexes setup completed"
        );
        report
    }

    async fn create_index(&self, spec: IndexSpec) -> Result<(), Error> {
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute_batch(spec.sql)?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Keep only the most recently inserted row per (title, page).
    ///
    /// Runs in one transaction: read the survivors, delete everything,
    /// reinsert the survivors in their original order.
    async fn repair_search_cache(&self) -> Result<RepairSummary, Error> {
        self.conn
            .call(|conn| -> Result<RepairSummary, Error> {
                let tx = conn.transaction()?;

                let scanned: i64 = tx.query_row("SELECT COUNT(*) FROM search_cache", [], |row| row.get(0))?;
                tx.execute_batch(&format!("DROP INDEX IF EXISTS {}", SEARCH_CACHE_INDEX.name))?;

                let survivors: Vec<(String, i64, String, String)> = {
                    let mut stmt = tx.prepare(
                        "SELECT title, page, data, created_at FROM search_cache
                         WHERE id IN (SELECT MAX(id) FROM search_cache GROUP BY title, page)
                         ORDER BY id",
                    )?;
                    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?;
                    rows.collect::<Result<Vec<_>, rusqlite::Error>>()?
                };

                tx.execute("DELETE FROM search_cache", [])?;
                {
                    let mut insert = tx.prepare(
                        "INSERT INTO search_cache (title, page, data, created_at) VALUES (?1, ?2, ?3, ?4)",
                    )?;
                    for (title, page, data, created_at) in &survivors {
                        insert.execute(params![title, page, data, created_at])?;
                    }
                }

                tx.commit()?;
                Ok(RepairSummary { scanned: scanned as usize, kept: survivors.len() })
            })
            .await
            .map_err(Error::from)
    }
}

fn record_failure(report: &mut BootstrapReport, spec: IndexSpec, err: &Error) {
    tracing::warn!(index = spec.name, error = %err, "could not create index");
    report.failed.push((spec.name, err.to_string()));
}
