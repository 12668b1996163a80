//! HTTP backend adapter

use crate::backend::query::stock_all_data_url;
use crate::backend::types::*;
use crate::backend::ScreenerBackend;
use crate::config::ScreenerConfig;
use crate::error::{AppError, Result};
use crate::filters::FilterState;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Screener backend reached over plain HTTP GETs
pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpBackend {
    pub fn new(config: &ScreenerConfig) -> Result<Self> {
        let timeout = config.http_timeout();

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client-side request timeout, `None` when left to the transport
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response, url)?;

        // Read the body first so a decode failure is reported as serialization, not transport
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn check_status(response: Response, url: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(AppError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl ScreenerBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch_stock_data(&self, filters: &FilterState) -> Result<Vec<RawStockRecord>> {
        let url = stock_all_data_url(&self.base_url, filters);
        self.get_json(&url).await.map_err(|e| {
            error!("Error fetching stock data: {}", e);
            e
        })
    }

    async fn fetch_sp500_companies(&self) -> Result<Vec<Sp500Company>> {
        let url = format!("{}/sp500", self.base_url);
        self.get_json(&url).await.map_err(|e| {
            error!("Error fetching S&P 500 companies: {}", e);
            e
        })
    }

    async fn fetch_stock_data_by_symbol(&self, symbol: &str) -> Result<Value> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AppError::Validation("Symbol is required".to_string()));
        }

        let url = format!("{}/stock-data/{}", self.base_url, urlencoding::encode(&symbol));
        match self.get_json(&url).await {
            Err(AppError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(AppError::NotFound(format!("Symbol {} not found", symbol)))
            }
            Err(e) => {
                error!("Error fetching data for symbol {}: {}", symbol, e);
                Err(e)
            }
            ok => ok,
        }
    }
}
