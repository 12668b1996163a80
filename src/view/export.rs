//! CSV export of the displayed result set

use crate::error::Result;
use crate::view::rows::StockRow;
use crate::view::table::Column;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write every row with every column. Numbers are raw, missing numbers are empty.
pub fn write_csv<W: Write>(rows: &[&StockRow], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(Column::ALL.iter().map(|c| c.header()))?;

    for row in rows {
        let record: Vec<String> = Column::ALL
            .iter()
            .map(|column| match column.text(row) {
                Some(text) => text.to_string(),
                None => column.number(row).map(|v| v.to_string()).unwrap_or_default(),
            })
            .collect();
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(rows.len())
}

pub fn export_to_path(rows: &[&StockRow], path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    let count = write_csv(rows, file)?;
    info!("Exported {} rows to {}", count, path.display());
    Ok(count)
}

pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("stock-screener-{}.csv", date.format("%Y-%m-%d"))
}
