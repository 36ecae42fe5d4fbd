//! Client code for shelf.
//!
//! This crate provides the Open Library HTTP client and the catalog services
//! built on it (cached search, descriptions, cover images) shared by the
//! server.

pub mod catalog;
pub mod openlibrary;

pub use catalog::{BookDraft, BookSource, Catalog, CatalogError, DescriptionFetcher, ImageCache};
pub use openlibrary::{OpenLibraryClient, OpenLibraryConfig, OpenLibraryError};
