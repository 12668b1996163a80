//! Result presentation
//!
//! Everything needed to turn a fetched result set into what the user sees:
//! row coercion, number formatting, the paged/sorted grid, the detail view
//! and CSV export.

pub mod detail;
pub mod export;
pub mod format;
pub mod rows;
pub mod table;

use crate::services::FetchStatus;
use table::ResultView;

pub const LOADING_MESSAGE: &str = "Loading...";

/// Main area of the dashboard for a given fetch status.
///
/// Loading and error both hide the grid.
pub fn render_results(status: &FetchStatus, view: &ResultView) -> String {
    match status {
        FetchStatus::Loading => LOADING_MESSAGE.to_string(),
        FetchStatus::Error(message) => message.clone(),
        FetchStatus::Idle | FetchStatus::Success => view.render(),
    }
}
