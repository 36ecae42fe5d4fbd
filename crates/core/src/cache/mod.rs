//! SQLite-backed document store for the book search caches.
//!
//! This module provides a persistent cache using SQLite with async access via
//! tokio-rusqlite. It holds three write-once collections:
//!
//! - `search_cache`: composed result sets keyed by (lower-cased query, page)
//! - `descriptions`: synopses keyed by work id
//! - `image_cache`: cover image metadata keyed by cover id
//!
//! Uniqueness on each key is established by [`CacheDb::initialize_indexes`],
//! which also repairs duplicate search-cache rows. Every insert treats a
//! duplicate-key collision as "already cached" rather than an error.

pub mod connection;
pub mod descriptions;
pub mod images;
pub mod indexes;
pub mod migrations;
pub mod search;
pub mod stats;

pub use crate::Error;

pub use connection::CacheDb;
pub use images::ImageRecord;
pub use indexes::{BootstrapReport, RepairSummary};
pub use search::SearchKey;
pub use stats::CacheStats;
