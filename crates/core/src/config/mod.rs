//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHELF_*)
//! 2. TOML config file (if SHELF_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHELF_*)
/// 2. TOML config file (if SHELF_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via SHELF_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Directory cover images are written to.
    ///
    /// Set via SHELF_IMAGE_DIR environment variable.
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// Public route prefix under which `image_dir` is served.
    ///
    /// Set via SHELF_IMAGE_ROUTE environment variable.
    #[serde(default = "default_image_route")]
    pub image_route: String,

    /// Upstream search endpoint.
    ///
    /// Set via SHELF_SEARCH_URL environment variable.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Upstream work record base URL (`<works_url>/<work_id>.json`).
    ///
    /// Set via SHELF_WORKS_URL environment variable.
    #[serde(default = "default_works_url")]
    pub works_url: String,

    /// Upstream cover image base URL (`<covers_url>/<cover_id>-L.jpg`).
    ///
    /// Set via SHELF_COVERS_URL environment variable.
    #[serde(default = "default_covers_url")]
    pub covers_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SHELF_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Search and work request timeout in milliseconds.
    ///
    /// Set via SHELF_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Cover download timeout in milliseconds.
    ///
    /// Set via SHELF_IMAGE_TIMEOUT_MS environment variable.
    #[serde(default = "default_image_timeout_ms")]
    pub image_timeout_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./shelf-cache.sqlite")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("static/images")
}

fn default_image_route() -> String {
    "/static/images".into()
}

fn default_search_url() -> String {
    "https://openlibrary.org/search.json".into()
}

fn default_works_url() -> String {
    "https://openlibrary.org/works".into()
}

fn default_covers_url() -> String {
    "https://covers.openlibrary.org/b/id".into()
}

fn default_user_agent() -> String {
    "shelf/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_image_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            image_dir: default_image_dir(),
            image_route: default_image_route(),
            search_url: default_search_url(),
            works_url: default_works_url(),
            covers_url: default_covers_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            image_timeout_ms: default_image_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Search/work timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cover download timeout as Duration.
    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHELF_`
    /// 2. TOML file from `SHELF_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHELF_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SHELF_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
