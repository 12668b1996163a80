//! Read-only detail view for one selected row

use crate::view::format::{format_decimal, format_price};
use crate::view::rows::StockRow;
use serde::Serialize;

/// Snapshot of a row taken when the view was opened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    row: StockRow,
}

impl DetailView {
    pub fn new(row: StockRow) -> Self {
        Self { row }
    }

    pub fn row(&self) -> &StockRow {
        &self.row
    }

    pub fn title(&self) -> String {
        format!("{} Details", self.row.symbol)
    }

    /// Labelled, formatted fields in display order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Date", self.row.date.clone()),
            ("Close Price", format_price(self.row.close)),
            ("Williams %R (21)", format_decimal(self.row.williams_r_21)),
            ("EMA(13) of Williams %R", format_decimal(self.row.ema_13_williams_r)),
            ("RSI 14", format_decimal(self.row.rsi_14)),
            ("RSI 21", format_decimal(self.row.rsi_21)),
        ]
    }

    pub fn render(&self) -> String {
        let fields = self.fields();
        let label_width = fields.iter().map(|(l, _)| l.len()).max().unwrap_or(0) + 1;

        let mut lines = vec![self.title()];
        lines.extend(fields.into_iter().map(|(label, value)| {
            format!("  {:<width$} {}", format!("{}:", label), value, width = label_width)
        }));
        lines.push("  [close]".to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::RawStockRecord;
    use serde_json::json;

    #[test]
    fn test_missing_close_renders_placeholder() {
        let raw: RawStockRecord = serde_json::from_value(json!({
            "Symbol": "NVDA",
            "Date": "2024-10-02",
            "Williams_R_21": -91.456,
            "EMA_13_Williams_R": -75.0,
            "RSI_14": 29.99,
            "RSI_21": 33.333
        }))
        .unwrap();
        let detail = DetailView::new(StockRow::from_raw(0, &raw));

        assert_eq!(detail.title(), "NVDA Details");
        let fields = detail.fields();
        assert_eq!(fields[1], ("Close Price", "N/A".to_string()));
        assert_eq!(fields[2], ("Williams %R (21)", "-91.46".to_string()));
        assert_eq!(fields[5], ("RSI 21", "33.33".to_string()));

        let text = detail.render();
        assert!(text.starts_with("NVDA Details"));
        assert!(text.contains("Close Price:"));
        assert!(text.ends_with("\n  [close]"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_empty_record_never_panics() {
        let detail = DetailView::new(StockRow::from_raw(0, &RawStockRecord::default()));
        assert_eq!(detail.title(), "N/A Details");
        assert!(detail.fields().iter().skip(1).all(|(_, v)| v == "N/A"));
    }
}
