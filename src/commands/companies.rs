//! S&P 500 directory commands

use crate::error::Result;
use crate::services::{CompanyListResult, CompanyService, SymbolDataResult};
use crate::state::AppState;

/// List S&P 500 companies, optionally filtered by symbol or name
pub async fn get_sp500_companies(state: &AppState, filter: Option<&str>) -> Result<CompanyListResult> {
    CompanyService::list_companies(state, filter).await
}

/// Get processed indicator data for one symbol
pub async fn get_symbol_data(state: &AppState, symbol: &str) -> Result<SymbolDataResult> {
    CompanyService::symbol_data(state, symbol).await
}
