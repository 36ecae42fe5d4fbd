//! Open Library API client.
//!
//! Provides a client for the three Open Library endpoints the catalog uses.
//!
//! ### Endpoints
//!
//! - **Search**: `GET <search>?q=<sanitized>&page=<n>` → `{num_found, docs[]}`
//! - **Work**: `GET <works>/<work_id>.json` → `{description}`
//! - **Cover**: `GET <covers>/<cover_id>-L.jpg` → image bytes
//!
//! Search and work calls share the client timeout. Cover downloads carry
//! their own shorter timeout so one slow image only fails that image.

pub mod error;
pub mod request;
pub mod response;

pub use error::OpenLibraryError;
pub use request::SearchRequest;
pub use response::{SearchDoc, SearchDocs, WorkDescription, WorkRecord};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header;
use serde::de::DeserializeOwned;
use shelf_core::AppConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::catalog::BookSource;

/// Default search endpoint.
const DEFAULT_SEARCH_URL: &str = "https://openlibrary.org/search.json";

/// Default work record base URL.
const DEFAULT_WORKS_URL: &str = "https://openlibrary.org/works";

/// Default cover image base URL.
const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org/b/id";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default cover download timeout.
const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "shelf/0.1";

/// Open Library client configuration.
#[derive(Debug, Clone)]
pub struct OpenLibraryConfig {
    pub search_url: String,
    pub works_url: String,
    pub covers_url: String,
    /// Search and work request timeout (default: 20s).
    pub timeout: Duration,
    /// Cover download timeout (default: 10s).
    pub image_timeout: Duration,
    pub user_agent: String,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            works_url: DEFAULT_WORKS_URL.to_string(),
            covers_url: DEFAULT_COVERS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for OpenLibraryConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            search_url: config.search_url.clone(),
            works_url: config.works_url.clone(),
            covers_url: config.covers_url.clone(),
            timeout: config.timeout(),
            image_timeout: config.image_timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Open Library API client.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    config: OpenLibraryConfig,
}

impl OpenLibraryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenLibraryConfig) -> Result<Self, OpenLibraryError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| OpenLibraryError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    async fn get(&self, url: Url, timeout: Option<Duration>) -> Result<reqwest::Response, OpenLibraryError> {
        let mut request = self.http.get(url.as_str());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(%url, %status, "open library response");

        if !status.is_success() {
            return Err(OpenLibraryError::HttpError { status: status.as_u16() });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, OpenLibraryError> {
        let response = self
            .get(url, None)
            .await?
            .bytes()
            .await?;
        serde_json::from_slice(&response).map_err(|e| OpenLibraryError::Parse(e.to_string()))
    }
}

#[async_trait]
impl BookSource for OpenLibraryClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchDocs, OpenLibraryError> {
        let start = Instant::now();
        let url = SearchRequest::new(query, page).to_url(&self.config.search_url)?;

        tracing::debug!(query, page, "searching open library");
        let docs: SearchDocs = self.get_json(url).await?;

        tracing::debug!(
            "search completed in {:?}, {} of {} results",
            start.elapsed(),
            docs.docs.len(),
            docs.num_found
        );
        Ok(docs)
    }

    async fn work(&self, work_id: &str) -> Result<WorkRecord, OpenLibraryError> {
        let url = request::work_url(&self.config.works_url, work_id)?;
        self.get_json(url).await
    }

    async fn cover(&self, cover_id: &str) -> Result<Bytes, OpenLibraryError> {
        let url = request::cover_url(&self.config.covers_url, cover_id)?;
        let response = self.get(url, Some(self.config.image_timeout)).await?;

        if let Some(content_type) = response.headers().get(header::CONTENT_TYPE)
            && !content_type.as_bytes().starts_with(b"image/")
        {
            return Err(OpenLibraryError::Parse(format!(
                "cover {cover_id}: unexpected content type {content_type:?}"
            )));
        }

        Ok(response.bytes().await?)
    }

    fn cover_url(&self, cover_id: &str) -> String {
        request::cover_url(&self.config.covers_url, cover_id)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}/{}-L.jpg", self.config.covers_url.trim_end_matches('/'), cover_id))
    }
}
