//! Raw record to display row mapping

use crate::backend::types::RawStockRecord;
use serde::Serialize;
use serde_json::Value;

/// Placeholder shown for missing text and missing numbers
pub const PLACEHOLDER: &str = "N/A";

/// One display row. Numbers are either parsed or `None`, never raw text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockRow {
    /// Position in the fetched result set; not stable across fetches
    pub id: usize,
    pub symbol: String,
    pub date: String,
    pub close: Option<f64>,
    pub williams_r_21: Option<f64>,
    pub ema_13_williams_r: Option<f64>,
    pub rsi_14: Option<f64>,
    pub rsi_21: Option<f64>,
}

impl StockRow {
    pub fn from_raw(id: usize, raw: &RawStockRecord) -> Self {
        Self {
            id,
            symbol: coerce_text(raw.symbol.as_ref()),
            date: coerce_text(raw.date.as_ref()),
            close: coerce_number(raw.close.as_ref()),
            williams_r_21: coerce_number(raw.williams_r_21.as_ref()),
            ema_13_williams_r: coerce_number(raw.ema_13_williams_r.as_ref()),
            rsi_14: coerce_number(raw.rsi_14.as_ref()),
            rsi_21: coerce_number(raw.rsi_21.as_ref()),
        }
    }

    /// Key that survives a re-fetch, unlike `id`
    pub fn natural_key(&self) -> String {
        format!("{}@{}", self.symbol, self.date)
    }
}

/// Map a fetched payload to rows, ids assigned by position
pub fn map_rows(records: &[RawStockRecord]) -> Vec<StockRow> {
    records
        .iter()
        .enumerate()
        .map(|(id, raw)| StockRow::from_raw(id, raw))
        .collect()
}

/// Falsy or absent values become the placeholder
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawStockRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_record() {
        let row = StockRow::from_raw(
            3,
            &raw(json!({
                "Symbol": "MSFT",
                "Date": "2024-09-30",
                "Close": 430.3,
                "Williams_R_21": -12.5,
                "EMA_13_Williams_R": -20.25,
                "RSI_14": 61.0,
                "RSI_21": 58.75
            })),
        );

        assert_eq!(row.id, 3);
        assert_eq!(row.symbol, "MSFT");
        assert_eq!(row.close, Some(430.3));
        assert_eq!(row.rsi_21, Some(58.75));
        assert_eq!(row.natural_key(), "MSFT@2024-09-30");
    }

    #[test]
    fn test_missing_numbers_become_none() {
        let row = StockRow::from_raw(0, &raw(json!({"Symbol": "AAPL", "Date": "2024-10-01"})));
        assert_eq!(row.close, None);
        assert_eq!(row.williams_r_21, None);
        assert_eq!(row.rsi_14, None);
        assert_eq!(row.rsi_21, None);
    }

    #[test]
    fn test_missing_text_becomes_placeholder() {
        let row = StockRow::from_raw(0, &raw(json!({"Close": 10.0})));
        assert_eq!(row.symbol, "N/A");
        assert_eq!(row.date, "N/A");

        let row = StockRow::from_raw(0, &raw(json!({"Symbol": "", "Date": null})));
        assert_eq!(row.symbol, "N/A");
        assert_eq!(row.date, "N/A");
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let row = StockRow::from_raw(
            0,
            &raw(json!({"Close": "101.5", "RSI_14": " 44 ", "RSI_21": "n/a", "Williams_R_21": true})),
        );
        assert_eq!(row.close, Some(101.5));
        assert_eq!(row.rsi_14, Some(44.0));
        assert_eq!(row.rsi_21, None);
        assert_eq!(row.williams_r_21, None);
    }

    #[test]
    fn test_ids_follow_position() {
        let records = vec![
            raw(json!({"Symbol": "A"})),
            raw(json!({"Symbol": "B"})),
            raw(json!({})),
        ];
        let rows = map_rows(&records);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(rows[2].symbol, "N/A");
    }
}
