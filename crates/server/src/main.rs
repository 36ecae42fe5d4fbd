//! shelf-mcp server entry point.
//!
//! Boots the MCP server on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use shelf_client::Catalog;
use shelf_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(db = %config.db_path.display(), images = %config.image_dir.display(), "starting shelf-mcp on stdio transport");

    let db = CacheDb::open(&config.db_path).await?;

    let report = db.initialize_indexes().await;
    if report.is_complete() {
        tracing::info!(created = report.created.len(), "cache indexes ready");
    } else {
        tracing::warn!(created = report.created.len(), failed = ?report.failed, "some cache indexes are missing");
    }
    if let Some(repair) = &report.repaired {
        tracing::info!(scanned = repair.scanned, kept = repair.kept, "search cache duplicates repaired");
    }

    match db.stats().await {
        Ok(stats) => tracing::info!(
            searches = stats.searches,
            descriptions = stats.descriptions,
            images = stats.images,
            "cache loaded"
        ),
        Err(e) => tracing::warn!(error = %e, "failed to read cache stats"),
    }

    let catalog = Catalog::from_config(db.clone(), &config)?;
    let handler = handler::ShelfServer::new(catalog);
    let server = serve_server(handler, stdio()).await?;

    let reason = server.waiting().await;
    tracing::info!(?reason, "transport closed, shutting down");

    db.close().await?;
    Ok(())
}
