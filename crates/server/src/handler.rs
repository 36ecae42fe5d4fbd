//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::book_search::{BookSearchParams, search_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use shelf_client::Catalog;

/// The main MCP server handler for shelf.
#[derive(Clone)]
pub struct ShelfServer {
    catalog: Arc<Catalog>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ShelfServer {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog: Arc::new(catalog), tool_router: Self::tool_router() }
    }

    /// Search books by free-text query.
    ///
    /// Repeat queries are answered from the cache; fresh results carry a
    /// synopsis and a cover image reference per book.
    #[tool(
        description = "Search books on Open Library. Returns {count, results[]} where each result has bID, title, sypnosis, date, authorF, authorL, genre and image."
    )]
    async fn book_search(&self, params: Parameters<BookSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.catalog, params.0).await
    }
}

impl ServerHandler for ShelfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "shelf".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{AppConfig, CacheDb};

    #[tokio::test]
    async fn test_lists_book_search_tool() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let catalog = Catalog::from_config(db, &AppConfig::default()).unwrap();
        let server = ShelfServer::new(catalog);

        let tools = server.tool_router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "book_search");
        assert_eq!(server.get_info().server_info.name, "shelf");
    }
}
