//! book_search tool implementation.
//!
//! Searches Open Library through the catalog, which serves repeat queries from
//! the search cache and enriches fresh results with synopses and cover images.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shelf_client::Catalog;
use shelf_core::Error;

/// Input parameters for book_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BookSearchParams {
    /// Free-text query (required).
    pub query: String,

    /// 1-based results page (default 1).
    #[serde(default)]
    pub page: Option<u32>,
}

/// Implementation of the book_search tool.
pub async fn search_impl(catalog: &Catalog, params: BookSearchParams) -> Result<CallToolResult, McpError> {
    if params.query.trim().is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()).into());
    }

    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(Error::InvalidInput("page must be at least 1".into()).into());
    }

    let results = catalog
        .search(&params.query, page)
        .await
        .map_err(|e| McpError::from(Error::from(e)))?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&results).unwrap_or_default(),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{AppConfig, BookSummary, CacheDb, NO_DESCRIPTION, ResultSet, SearchKey};

    async fn catalog(db: CacheDb) -> (Catalog, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            image_dir: dir.path().to_path_buf(),
            search_url: "http://127.0.0.1:9/search.json".into(),
            ..Default::default()
        };
        (Catalog::from_config(db, &config).unwrap(), dir)
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_query() {
        let (catalog, _dir) = catalog(CacheDb::open_in_memory().await.unwrap()).await;
        let params = BookSearchParams { query: "   ".into(), page: None };

        let err = search_impl(&catalog, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_page_zero() {
        let (catalog, _dir) = catalog(CacheDb::open_in_memory().await.unwrap()).await;
        let params = BookSearchParams { query: "gatsby".into(), page: Some(0) };

        let err = search_impl(&catalog, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_cached_results_are_returned_as_json() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let cached = ResultSet {
            count: 1,
            results: vec![BookSummary {
                work_id: "OL123W".into(),
                title: "The Great Gatsby".into(),
                synopsis: NO_DESCRIPTION.into(),
                first_publish_year: Some(1925),
                author_first: "F.".into(),
                author_last: "Fitzgerald".into(),
                genre: "Fiction".into(),
                image: "/static/images/12345.jpg".into(),
            }],
        };
        db.insert_search(&SearchKey::new("Gatsby", 1), &cached).await.unwrap();

        let (catalog, _dir) = catalog(db).await;
        let params = BookSearchParams { query: "Gatsby".into(), page: None };

        let result = search_impl(&catalog, params).await.unwrap();
        assert!(!result.is_error.unwrap_or(false));

        let json: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["results"][0]["bID"], "OL123W");
        assert_eq!(json["results"][0]["sypnosis"], NO_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_an_http_error() {
        let (catalog, _dir) = catalog(CacheDb::open_in_memory().await.unwrap()).await;
        let params = BookSearchParams { query: "uncached".into(), page: Some(2) };

        let err = search_impl(&catalog, params).await.unwrap_err();
        assert!(matches!(err.code.0, -32008 | -32006));
    }
}
