//! Screener backend adapters
//!
//! The backend computes and stores the indicator data; this crate only
//! queries it over HTTP.

pub mod http;
pub mod query;
pub mod types;

use crate::error::Result;
use crate::filters::FilterState;
use async_trait::async_trait;
use serde_json::Value;
use types::*;

pub use http::HttpBackend;

/// Data source that every backend implementation must provide
#[async_trait]
pub trait ScreenerBackend: Send + Sync {
    /// Backend display name for logs
    fn name(&self) -> &str;

    /// Stock rows matching the filter ranges
    async fn fetch_stock_data(&self, filters: &FilterState) -> Result<Vec<RawStockRecord>>;

    /// S&P 500 constituent list
    async fn fetch_sp500_companies(&self) -> Result<Vec<Sp500Company>>;

    /// Processed payload for a single symbol
    async fn fetch_stock_data_by_symbol(&self, symbol: &str) -> Result<Value>;
}
