//! Stock table commands

use crate::error::{AppError, Result};
use crate::services::FetchStatus;
use crate::state::AppState;
use crate::view::export::{default_export_file_name, export_to_path};
use crate::view::render_results;
use crate::view::table::{Column, SortDirection, SortSpec};
use serde::Serialize;
use std::path::PathBuf;
use tokio::task::JoinHandle;

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: PathBuf,
    pub rows_exported: usize,
}

/// Re-fetch with the current filters
pub fn refresh_stock_data(state: &AppState) -> JoinHandle<()> {
    tracing::info!("Manual refresh");
    state.refresh()
}

/// Main results area: busy indicator, error message, placeholder or grid
pub fn get_results(state: &AppState) -> String {
    let status = state.fetch_status();
    state.with_view(|view| render_results(&status, view))
}

/// Jump to a one-based page number; returns the page actually shown
pub fn set_page(state: &AppState, page: usize) -> usize {
    state.with_view(|view| view.set_page(page.saturating_sub(1)) + 1)
}

pub fn set_page_size(state: &AppState, page_size: usize) -> Result<()> {
    state.with_view(|view| view.set_page_size(page_size))
}

pub fn sort_by(state: &AppState, column: &str, direction: Option<&str>) -> Result<SortSpec> {
    let column: Column = column.parse()?;
    let direction = match direction {
        Some(d) => d.parse()?,
        None => SortDirection::Asc,
    };

    let spec = SortSpec { column, direction };
    state.with_view(|view| view.set_sort(Some(spec)));
    Ok(spec)
}

pub fn clear_sort(state: &AppState) {
    state.with_view(|view| view.set_sort(None));
}

/// Open the detail view by row id, `Symbol@Date` key or symbol; returns the rendered view
pub fn open_detail(state: &AppState, target: &str) -> Result<String> {
    if state.fetch_status() != FetchStatus::Success {
        return Err(AppError::Validation("No loaded results to open".to_string()));
    }

    let target = target.trim();
    state.with_view(|view| {
        let detail = if let Ok(id) = target.parse::<usize>() {
            view.open_detail(id)?
        } else if target.contains('@') {
            view.open_detail_by_key(target)?
        } else {
            view.open_detail_by_symbol(target)?
        };
        Ok(detail.render())
    })
}

/// Currently open detail view, if any
pub fn get_detail(state: &AppState) -> Option<String> {
    state.with_view(|view| view.detail().map(|d| d.render()))
}

pub fn close_detail(state: &AppState) {
    state.with_view(|view| view.close_detail());
}

/// Write every row of the current result set, in display order, to CSV
pub fn export_csv(state: &AppState, path: Option<PathBuf>) -> Result<ExportResponse> {
    if state.fetch_status() != FetchStatus::Success {
        return Err(AppError::Validation("No loaded results to export".to_string()));
    }

    let path = path.unwrap_or_else(|| {
        PathBuf::from(default_export_file_name(chrono::Local::now().date_naive()))
    });

    let rows_exported = state.with_view(|view| {
        if view.is_empty() {
            return Err(AppError::Validation("No data available to export".to_string()));
        }
        export_to_path(&view.sorted_rows(), &path)
    })?;

    Ok(ExportResponse {
        path,
        rows_exported,
    })
}
