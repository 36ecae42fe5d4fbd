//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - a timeout is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - an upstream URL is not an absolute http(s) URL
    /// - `image_route` does not start with `/`
    ///
    /// Returns `ConfigError::Missing` if `image_dir` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_timeout("timeout_ms", self.timeout_ms)?;
        check_timeout("image_timeout_ms", self.image_timeout_ms)?;

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        check_url("search_url", &self.search_url)?;
        check_url("works_url", &self.works_url)?;
        check_url("covers_url", &self.covers_url)?;

        if !self.image_route.starts_with('/') {
            return Err(ConfigError::Invalid { field: "image_route".into(), reason: "must start with '/'".into() });
        }

        if self.image_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "image_dir".into(),
                hint: "Set SHELF_IMAGE_DIR environment variable".into(),
            });
        }

        if self.image_route.ends_with('/') {
            tracing::warn!(image_route = %self.image_route, "image_route has a trailing '/'; it will be trimmed");
        }

        Ok(())
    }
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < MIN_TIMEOUT_MS {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
    }
    if value > MAX_TIMEOUT_MS {
        return Err(ConfigError::Invalid {
            field: field.into(),
            reason: "must not exceed 5 minutes (300000ms)".into(),
        });
    }
    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::Invalid { field: field.into(), reason: e.to_string() })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid { field: field.into(), reason: "scheme must be http or https".into() });
    }
    Ok(())
}
