//! Application state management

use crate::backend::{HttpBackend, ScreenerBackend};
use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::filters::FilterState;
use crate::services::{FetchStatus, ScreenerService};
use crate::view::table::ResultView;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Table presentation plus the result set it was last synced to
struct ViewState {
    table: ResultView,
    synced_seq: u64,
}

/// Application state shared across all commands
pub struct AppState {
    /// Loaded configuration
    pub config: ScreenerConfig,

    /// Screener backend
    pub backend: Arc<dyn ScreenerBackend>,

    /// Fetch orchestrator for the stock table
    pub screener: Arc<ScreenerService>,

    /// Current filter ranges
    filters: RwLock<FilterState>,

    /// Sorting, paging and detail selection
    view: RwLock<ViewState>,
}

impl AppState {
    /// Create new application state backed by the HTTP API
    pub fn new(config: ScreenerConfig) -> Result<Self> {
        let backend = Arc::new(HttpBackend::new(&config)?);
        match backend.timeout() {
            Some(timeout) => tracing::info!("Screener API: {} (timeout {:?})", backend.base_url(), timeout),
            None => tracing::info!("Screener API: {}", backend.base_url()),
        }
        Ok(Self::with_backend(config, backend))
    }

    /// Create application state over any backend
    pub fn with_backend(config: ScreenerConfig, backend: Arc<dyn ScreenerBackend>) -> Self {
        let screener = Arc::new(ScreenerService::new(backend.clone(), config.debounce()));
        let table = ResultView::new(config.page_size);

        Self {
            config,
            backend,
            screener,
            filters: RwLock::new(FilterState::default()),
            view: RwLock::new(ViewState {
                table,
                synced_seq: 0,
            }),
        }
    }

    /// Get current filters
    pub fn get_filters(&self) -> FilterState {
        *self.filters.read()
    }

    /// Replace the filters and re-fetch
    pub fn set_filters(&self, filters: FilterState) -> JoinHandle<()> {
        *self.filters.write() = filters;
        tracing::debug!("Filters updated: {:?}", filters);
        self.screener.spawn_fetch(filters)
    }

    /// Re-fetch with the current filters
    pub fn refresh(&self) -> JoinHandle<()> {
        self.screener.spawn_fetch(self.get_filters())
    }

    pub fn fetch_status(&self) -> FetchStatus {
        self.screener.status()
    }

    /// Run `f` against the result view, first pulling in any newer result set
    pub fn with_view<R>(&self, f: impl FnOnce(&mut ResultView) -> R) -> R {
        let mut view = self.view.write();

        let result = self.screener.result();
        if result.seq != view.synced_seq {
            view.table.replace_rows(result.rows.clone());
            view.table.set_fetched_at(result.fetched_at);
            view.synced_seq = result.seq;
        }

        f(&mut view.table)
    }
}
