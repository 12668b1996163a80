//! Screener configuration
//!
//! Everything is read from the environment once at startup:
//! - `SCREENER_API_URL` - backend base URL (default `http://localhost:5001/api`)
//! - `SCREENER_DEBOUNCE_MS` - delay before a filter change hits the network (default 0)
//! - `SCREENER_PAGE_SIZE` - rows per table page, one of 25/50/100 (default 25)
//! - `SCREENER_HTTP_TIMEOUT_SECS` - optional request timeout; unset or 0 leaves the transport default

use crate::error::{AppError, Result};
use crate::view::table::PAGE_SIZE_OPTIONS;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001/api";
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Screener client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    pub api_base_url: String,
    pub debounce_ms: u64,
    pub page_size: usize,
    /// `None` means no client-side timeout
    pub http_timeout_secs: Option<u64>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            debounce_ms: 0,
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout_secs: None,
        }
    }
}

impl ScreenerConfig {
    /// Load configuration from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("SCREENER_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("SCREENER_DEBOUNCE_MS") {
            config.debounce_ms = parse_number(&raw, "SCREENER_DEBOUNCE_MS")?;
        }
        if let Some(raw) = lookup("SCREENER_PAGE_SIZE") {
            config.page_size = parse_number(&raw, "SCREENER_PAGE_SIZE")?;
        }
        if let Some(raw) = lookup("SCREENER_HTTP_TIMEOUT_SECS") {
            let secs: u64 = parse_number(&raw, "SCREENER_HTTP_TIMEOUT_SECS")?;
            config.http_timeout_secs = Some(secs).filter(|s| *s > 0);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the values that the rest of the client relies on
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            AppError::Config(format!("Invalid API base URL '{}': {}", self.api_base_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AppError::Config(format!(
                "API base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if !PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            return Err(AppError::Config(format!(
                "Page size must be one of {:?}, got {}",
                PAGE_SIZE_OPTIONS, self.page_size
            )));
        }

        if self.http_timeout_secs == Some(0) {
            return Err(AppError::Config(
                "HTTP timeout must be positive; leave it unset for none".to_string(),
            ));
        }

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a non-negative integer, got '{}'", key, raw)))
}
