//! Company Service
//!
//! S&P 500 directory and single-symbol lookups. These go straight to the
//! backend and do not touch the stock table.

use crate::backend::types::{RawStockRecord, Sp500Company};
use crate::error::Result;
use crate::state::AppState;
use crate::view::rows::StockRow;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Filtered company listing
#[derive(Debug, Clone, Serialize)]
pub struct CompanyListResult {
    pub total: usize,
    pub companies: Vec<Sp500Company>,
}

/// Payload for one symbol. `row` is set when the payload has record shape.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolDataResult {
    pub symbol: String,
    pub row: Option<StockRow>,
    pub payload: Value,
}

pub struct CompanyService;

impl CompanyService {
    /// List constituents, optionally narrowed by a symbol/name substring
    pub async fn list_companies(state: &AppState, filter: Option<&str>) -> Result<CompanyListResult> {
        info!("CompanyService::list_companies - filter {:?}", filter);

        let companies = state.backend.fetch_sp500_companies().await?;
        let total = companies.len();

        let companies = match filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(needle) => companies.into_iter().filter(|c| c.matches(needle)).collect(),
            None => companies,
        };

        Ok(CompanyListResult { total, companies })
    }

    /// Processed data for one symbol
    pub async fn symbol_data(state: &AppState, symbol: &str) -> Result<SymbolDataResult> {
        let symbol = symbol.trim().to_uppercase();
        info!("CompanyService::symbol_data - {}", symbol);

        let payload = state.backend.fetch_stock_data_by_symbol(&symbol).await?;

        let row = if RawStockRecord::looks_like_record(&payload) {
            let raw: RawStockRecord = serde_json::from_value(payload.clone())?;
            Some(StockRow::from_raw(0, &raw))
        } else {
            None
        };

        Ok(SymbolDataResult {
            symbol,
            row,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScreenerBackend;
    use crate::config::ScreenerConfig;
    use crate::error::AppError;
    use crate::filters::FilterState;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct DirectoryBackend;

    #[async_trait]
    impl ScreenerBackend for DirectoryBackend {
        fn name(&self) -> &str {
            "directory"
        }

        async fn fetch_stock_data(&self, _filters: &FilterState) -> Result<Vec<RawStockRecord>> {
            Ok(vec![])
        }

        async fn fetch_sp500_companies(&self) -> Result<Vec<Sp500Company>> {
            Ok(serde_json::from_value(json!([
                {"Symbol": "AAPL", "Security": "Apple Inc."},
                {"Symbol": "AMZN", "Security": "Amazon"},
                {"Symbol": "XOM", "Security": "ExxonMobil"}
            ]))?)
        }

        async fn fetch_stock_data_by_symbol(&self, symbol: &str) -> Result<Value> {
            match symbol {
                "AAPL" => Ok(json!({"Symbol": "AAPL", "Date": "2024-10-01", "RSI_14": 52.5})),
                "HIST" => Ok(json!([{"Date": "2024-10-01"}])),
                _ => Err(AppError::NotFound(format!("Symbol {} not found", symbol))),
            }
        }
    }

    fn state() -> AppState {
        AppState::with_backend(ScreenerConfig::default(), Arc::new(DirectoryBackend))
    }

    #[tokio::test]
    async fn test_list_companies_filters_by_name_or_symbol() {
        let state = state();

        let all = CompanyService::list_companies(&state, None).await.unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.companies.len(), 3);

        let some = CompanyService::list_companies(&state, Some("am")).await.unwrap();
        assert_eq!(some.total, 3);
        let symbols: Vec<&str> = some.companies.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AMZN"]);
    }

    #[tokio::test]
    async fn test_symbol_data_maps_record_payloads() {
        let state = state();

        let result = CompanyService::symbol_data(&state, " aapl ").await.unwrap();
        assert_eq!(result.symbol, "AAPL");
        let row = result.row.unwrap();
        assert_eq!(row.rsi_14, Some(52.5));
        assert_eq!(row.close, None);

        let history = CompanyService::symbol_data(&state, "hist").await.unwrap();
        assert!(history.row.is_none());
        assert!(history.payload.is_array());

        let missing = CompanyService::symbol_data(&state, "zzzz").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
