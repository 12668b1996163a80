//! Tabular result view: columns, sorting, local paging and text rendering

use crate::error::{AppError, Result};
use crate::view::detail::DetailView;
use crate::view::format::{format_decimal, format_price};
use crate::view::rows::StockRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

pub const PAGE_SIZE_OPTIONS: [usize; 3] = [25, 50, 100];

pub const EMPTY_MESSAGE: &str = "No data available.";

/// Fixed table columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Symbol,
    Date,
    Close,
    WilliamsR21,
    Ema13WilliamsR,
    Rsi14,
    Rsi21,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Symbol,
        Column::Date,
        Column::Close,
        Column::WilliamsR21,
        Column::Ema13WilliamsR,
        Column::Rsi14,
        Column::Rsi21,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Symbol => "Symbol",
            Column::Date => "Date",
            Column::Close => "Close Price",
            Column::WilliamsR21 => "Williams %R (21)",
            Column::Ema13WilliamsR => "EMA(13) of Williams %R",
            Column::Rsi14 => "RSI 14",
            Column::Rsi21 => "RSI 21",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Column::Symbol | Column::Date)
    }

    pub fn number(&self, row: &StockRow) -> Option<f64> {
        match self {
            Column::Symbol | Column::Date => None,
            Column::Close => row.close,
            Column::WilliamsR21 => row.williams_r_21,
            Column::Ema13WilliamsR => row.ema_13_williams_r,
            Column::Rsi14 => row.rsi_14,
            Column::Rsi21 => row.rsi_21,
        }
    }

    pub fn text<'a>(&self, row: &'a StockRow) -> Option<&'a str> {
        match self {
            Column::Symbol => Some(&row.symbol),
            Column::Date => Some(&row.date),
            _ => None,
        }
    }

    /// Cell as shown in the grid
    pub fn display(&self, row: &StockRow) -> String {
        match self {
            Column::Symbol => row.symbol.clone(),
            Column::Date => row.date.clone(),
            Column::Close => format_price(row.close),
            _ => format_decimal(self.number(row)),
        }
    }
}

impl FromStr for Column {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        let column = match needle.as_str() {
            "symbol" => Column::Symbol,
            "date" => Column::Date,
            "close" | "price" => Column::Close,
            "williams" | "williamsr" | "williams_r_21" => Column::WilliamsR21,
            "ema" | "emawilliamsr" | "ema_13_williams_r" => Column::Ema13WilliamsR,
            "rsi14" | "rsi_14" => Column::Rsi14,
            "rsi21" | "rsi_21" => Column::Rsi21,
            _ => return Err(AppError::Validation(format!("Unknown column '{}'", s))),
        };
        Ok(column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AppError::Validation(format!("Unknown sort direction '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

/// One page of the grid
#[derive(Debug, Clone, Serialize)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a StockRow>,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
}

/// Presentation state for the current result set
#[derive(Debug, Clone)]
pub struct ResultView {
    rows: Vec<StockRow>,
    sort: Option<SortSpec>,
    page: usize,
    page_size: usize,
    selected: Option<usize>,
    detail: Option<DetailView>,
    fetched_at: Option<DateTime<Utc>>,
}

impl ResultView {
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            sort: None,
            page: 0,
            page_size,
            selected: None,
            detail: None,
            fetched_at: None,
        }
    }

    /// Swap in a freshly fetched result set.
    ///
    /// The row selection points into the old set and is dropped; an open
    /// detail view holds its own copy and stays as it is.
    pub fn replace_rows(&mut self, rows: Vec<StockRow>) {
        self.rows = rows;
        self.page = 0;
        self.selected = None;
    }

    /// When the current rows were fetched; shown in the footer
    pub fn set_fetched_at(&mut self, fetched_at: Option<DateTime<Utc>>) {
        self.fetched_at = fetched_at;
    }

    pub fn rows(&self) -> &[StockRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.page = 0;
    }

    /// Rows in display order; `None` numbers always sort last
    pub fn sorted_rows(&self) -> Vec<&StockRow> {
        let mut rows: Vec<&StockRow> = self.rows.iter().collect();
        if let Some(spec) = self.sort {
            rows.sort_by(|a, b| compare_rows(spec, a, b));
        }
        rows
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(AppError::Validation(format!(
                "Page size must be one of {:?}",
                PAGE_SIZE_OPTIONS
            )));
        }
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    /// Zero-based page index, clamped to the last page
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.min(self.page_count() - 1);
        self.page
    }

    pub fn current_page(&self) -> TablePage<'_> {
        let page = self.page.min(self.page_count() - 1);
        let rows = self
            .sorted_rows()
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        TablePage {
            rows,
            page,
            page_count: self.page_count(),
            page_size: self.page_size,
            total_rows: self.rows.len(),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    /// Open the detail view for a row id of the current result set
    pub fn open_detail(&mut self, id: usize) -> Result<&DetailView> {
        let row = self
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No row with id {}", id)))?;

        self.selected = Some(id);
        Ok(&*self.detail.insert(DetailView::new(row)))
    }

    /// Open the detail view for the first displayed row with this symbol
    pub fn open_detail_by_symbol(&mut self, symbol: &str) -> Result<&DetailView> {
        let id = self
            .sorted_rows()
            .into_iter()
            .find(|r| r.symbol.eq_ignore_ascii_case(symbol))
            .map(|r| r.id)
            .ok_or_else(|| AppError::NotFound(format!("No row for symbol {}", symbol)))?;
        self.open_detail(id)
    }

    /// Open the detail view by `Symbol@Date`, which survives a re-fetch
    pub fn open_detail_by_key(&mut self, key: &str) -> Result<&DetailView> {
        let id = self
            .rows
            .iter()
            .find(|r| r.natural_key().eq_ignore_ascii_case(key))
            .map(|r| r.id)
            .ok_or_else(|| AppError::NotFound(format!("No row for {}", key)))?;
        self.open_detail(id)
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.selected = None;
    }

    /// Text grid for the current page, or the empty placeholder
    pub fn render(&self) -> String {
        if self.is_empty() {
            return EMPTY_MESSAGE.to_string();
        }

        let page = self.current_page();
        let cells: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|row| {
                // selected row is marked in the id column
                let id = match self.selected {
                    Some(selected) if selected == row.id => format!("*{}", row.id),
                    _ => row.id.to_string(),
                };
                let mut line = vec![id];
                line.extend(Column::ALL.iter().map(|c| c.display(row)));
                line
            })
            .collect();

        let mut headers = vec!["#".to_string()];
        headers.extend(Column::ALL.iter().map(|c| {
            match self.sort {
                Some(spec) if spec.column == *c => match spec.direction {
                    SortDirection::Asc => format!("{} ^", c.header()),
                    SortDirection::Desc => format!("{} v", c.header()),
                },
                _ => c.header().to_string(),
            }
        }));

        let widths: Vec<usize> = (0..headers.len())
            .map(|i| {
                cells
                    .iter()
                    .map(|line| line[i].chars().count())
                    .chain(std::iter::once(headers[i].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        // index 0 is the row id
        let right_aligned = |i: usize| i == 0 || Column::ALL[i - 1].is_numeric();

        let format_line = |line: &[String]| -> String {
            line.iter()
                .enumerate()
                .map(|(i, cell)| {
                    if right_aligned(i) {
                        format!("{:>width$}", cell, width = widths[i])
                    } else {
                        format!("{:<width$}", cell, width = widths[i])
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ")
        };

        let header_line = format_line(&headers);
        let rule = "-".repeat(header_line.chars().count());
        let mut lines = vec![header_line, rule];
        lines.extend(cells.iter().map(|line| format_line(line)));

        let first = page.page * page.page_size + 1;
        let last = first + page.rows.len() - 1;
        let mut footer = format!(
            "Rows {}-{} of {} | Page {} of {} | {} per page",
            first,
            last,
            page.total_rows,
            page.page + 1,
            page.page_count,
            page.page_size
        );
        if let Some(fetched_at) = self.fetched_at {
            footer.push_str(&format!(" | Updated {}", fetched_at.format("%Y-%m-%d %H:%M:%S UTC")));
        }
        lines.push(footer);

        lines.join("\n")
    }
}

fn compare_rows(spec: SortSpec, a: &StockRow, b: &StockRow) -> Ordering {
    if spec.column.is_numeric() {
        match (spec.column.number(a), spec.column.number(b)) {
            (Some(x), Some(y)) => directed(x.total_cmp(&y), spec.direction),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    } else {
        let x = spec.column.text(a).unwrap_or_default();
        let y = spec.column.text(b).unwrap_or_default();
        directed(x.cmp(y), spec.direction)
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: usize, symbol: &str, rsi_14: Option<f64>) -> StockRow {
        StockRow {
            id,
            symbol: symbol.to_string(),
            date: "2024-10-01".to_string(),
            close: Some(100.0 + id as f64),
            williams_r_21: Some(-50.0),
            ema_13_williams_r: None,
            rsi_14,
            rsi_21: Some(45.123),
        }
    }

    fn rows(n: usize) -> Vec<StockRow> {
        (0..n).map(|i| row(i, &format!("S{:03}", i), Some(i as f64))).collect()
    }

    #[test]
    fn test_empty_result_renders_placeholder() {
        let view = ResultView::new(25);
        assert!(view.is_empty());
        assert_eq!(view.render(), "No data available.");
    }

    #[test]
    fn test_render_formats_two_decimals_and_placeholders() {
        let mut view = ResultView::new(25);
        view.replace_rows(vec![row(0, "AAPL", None)]);

        let text = view.render();
        assert!(text.contains("Williams %R (21)"));
        assert!(text.contains("EMA(13) of Williams %R"));
        assert!(text.contains("$100.00"));
        assert!(text.contains("-50.00"));
        assert!(text.contains("45.12"));
        assert!(text.contains("N/A"));
        assert!(text.ends_with("Rows 1-1 of 1 | Page 1 of 1 | 25 per page"));
    }

    #[test]
    fn test_sort_puts_missing_last_in_both_directions() {
        let mut view = ResultView::new(25);
        view.replace_rows(vec![
            row(0, "B", Some(50.0)),
            row(1, "A", None),
            row(2, "C", Some(10.0)),
        ]);

        view.set_sort(Some(SortSpec {
            column: Column::Rsi14,
            direction: SortDirection::Asc,
        }));
        let ids: Vec<usize> = view.sorted_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 0, 1]);

        view.set_sort(Some(SortSpec {
            column: Column::Rsi14,
            direction: SortDirection::Desc,
        }));
        let ids: Vec<usize> = view.sorted_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 2, 1]);

        view.set_sort(Some(SortSpec {
            column: Column::Symbol,
            direction: SortDirection::Asc,
        }));
        let symbols: Vec<&str> = view.sorted_rows().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A", "B", "C"]);

        // underlying order and ids untouched
        assert_eq!(view.rows()[0].symbol, "B");
    }

    #[test]
    fn test_paging_clamps() {
        let mut view = ResultView::new(25);
        view.replace_rows(rows(60));

        assert_eq!(view.page_count(), 3);
        assert_eq!(view.set_page(10), 2);
        let page = view.current_page();
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.rows[0].id, 50);

        view.set_page_size(50).unwrap();
        assert_eq!(view.page_count(), 2);
        assert_eq!(view.current_page().page, 0);

        assert!(view.set_page_size(30).is_err());
        assert_eq!(view.page_size(), 50);
    }

    #[test]
    fn test_detail_survives_replacement_until_closed() {
        let mut view = ResultView::new(25);
        view.replace_rows(vec![row(0, "AAPL", Some(30.0)), row(1, "MSFT", Some(40.0))]);

        view.open_detail(1).unwrap();
        assert_eq!(view.selected(), Some(1));
        assert!(view.render().contains("*1 |"));

        view.replace_rows(vec![row(0, "XOM", Some(70.0))]);
        assert_eq!(view.selected(), None);
        assert!(!view.render().contains('*'));
        assert_eq!(view.detail().unwrap().row().symbol, "MSFT");

        view.close_detail();
        assert!(view.detail().is_none());
    }

    #[test]
    fn test_open_detail_errors() {
        let mut view = ResultView::new(25);
        view.replace_rows(vec![row(0, "AAPL", None)]);

        assert!(matches!(view.open_detail(7), Err(AppError::NotFound(_))));
        assert_eq!(view.open_detail_by_symbol("aapl").unwrap().row().id, 0);
        assert!(view.open_detail_by_symbol("TSLA").is_err());
    }

    #[test]
    fn test_open_detail_by_natural_key() {
        let mut view = ResultView::new(25);
        view.replace_rows(vec![row(0, "AAPL", None), row(1, "MSFT", Some(40.0))]);

        assert_eq!(view.open_detail_by_key("msft@2024-10-01").unwrap().row().id, 1);

        // same record at a new position after a re-fetch
        view.replace_rows(vec![row(0, "MSFT", Some(41.0))]);
        assert_eq!(view.open_detail_by_key("MSFT@2024-10-01").unwrap().row().id, 0);
        assert!(view.open_detail_by_key("MSFT@2024-09-30").is_err());
    }

    #[test]
    fn test_footer_shows_fetch_time() {
        let mut view = ResultView::new(25);
        view.replace_rows(vec![row(0, "AAPL", None)]);
        let fetched_at = DateTime::parse_from_rfc3339("2024-10-01T14:30:05Z")
            .unwrap()
            .with_timezone(&Utc);
        view.set_fetched_at(Some(fetched_at));

        assert!(view
            .render()
            .ends_with("25 per page | Updated 2024-10-01 14:30:05 UTC"));
    }

    #[test]
    fn test_column_parsing() {
        assert_eq!("RSI14".parse::<Column>().unwrap(), Column::Rsi14);
        assert_eq!("ema".parse::<Column>().unwrap(), Column::Ema13WilliamsR);
        assert_eq!("close".parse::<Column>().unwrap(), Column::Close);
        assert!("volume".parse::<Column>().is_err());
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
    }
}
