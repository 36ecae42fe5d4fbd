//! Core types and shared functionality for shelf.
//!
//! This crate provides:
//! - Document store with SQLite backend (search, description and image caches)
//! - Startup index bootstrap with duplicate repair
//! - Query normalization
//! - Unified error types
//! - Configuration structures

pub mod books;
pub mod cache;
pub mod config;
pub mod error;
pub mod sanitize;

pub use books::{BookSummary, NO_DESCRIPTION, ResultSet, UNKNOWN_TITLE};
pub use cache::{BootstrapReport, CacheDb, CacheStats, ImageRecord, SearchKey};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
