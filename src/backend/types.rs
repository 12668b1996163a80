//! Wire types returned by the screener backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One stock/date row as served by `/stock-all-data`.
///
/// Every field is optional and kept as raw JSON; the backend is not trusted
/// to send well-typed values. Coercion happens in `view::rows`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStockRecord {
    #[serde(rename = "Symbol", skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Value>,
    #[serde(rename = "Date", skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    #[serde(rename = "Close", skip_serializing_if = "Option::is_none")]
    pub close: Option<Value>,
    #[serde(rename = "Williams_R_21", skip_serializing_if = "Option::is_none")]
    pub williams_r_21: Option<Value>,
    #[serde(rename = "EMA_13_Williams_R", skip_serializing_if = "Option::is_none")]
    pub ema_13_williams_r: Option<Value>,
    #[serde(rename = "RSI_14", skip_serializing_if = "Option::is_none")]
    pub rsi_14: Option<Value>,
    #[serde(rename = "RSI_21", skip_serializing_if = "Option::is_none")]
    pub rsi_21: Option<Value>,
}

impl RawStockRecord {
    /// Whether a JSON payload looks like a stock record at all
    pub fn looks_like_record(value: &Value) -> bool {
        value
            .as_object()
            .map(|obj| obj.contains_key("Symbol") || obj.contains_key("Date"))
            .unwrap_or(false)
    }
}

/// S&P 500 constituent from `/sp500`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sp500Company {
    #[serde(rename = "Symbol", default)]
    pub symbol: String,
    #[serde(rename = "Security", alias = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "GICS Sector", alias = "Sector", default)]
    pub sector: Option<String>,
    /// Remaining CSV columns, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sp500Company {
    /// Case-insensitive match on symbol or name
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.symbol.to_lowercase().contains(&needle)
            || self
                .name
                .as_deref()
                .map(|n| n.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}
