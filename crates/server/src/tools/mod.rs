//! MCP tool implementations.
//!
//! This module contains all tools exposed by the shelf server.

pub mod book_search;

pub use book_search::BookSearchParams;
