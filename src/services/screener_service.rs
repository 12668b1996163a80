//! Screener Service
//!
//! Owns the fetch lifecycle for the stock table: translates filters into a
//! backend request, tracks idle/loading/success/error and keeps the latest
//! result set.
//!
//! Every fetch gets a sequence number when it is issued. Only the response
//! to the most recently issued fetch is applied; anything older that
//! resolves later is dropped.

use crate::backend::types::RawStockRecord;
use crate::backend::ScreenerBackend;
use crate::error::Result;
use crate::filters::FilterState;
use crate::view::rows::{map_rows, StockRow};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// The one message users see for any failed fetch
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch stock data. Please try again later.";

/// Lifecycle of the stock table fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Rows from one successful fetch
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultSet {
    /// Sequence number of the fetch that produced it; 0 before the first success
    pub seq: u64,
    pub rows: Vec<StockRow>,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct FetchState {
    status: FetchStatus,
    result: Arc<ResultSet>,
}

/// Fetch orchestrator for the stock table
pub struct ScreenerService {
    backend: Arc<dyn ScreenerBackend>,
    debounce: Duration,
    issued: AtomicU64,
    state: RwLock<FetchState>,
    changes: watch::Sender<u64>,
}

impl ScreenerService {
    pub fn new(backend: Arc<dyn ScreenerBackend>, debounce: Duration) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            backend,
            debounce,
            issued: AtomicU64::new(0),
            state: RwLock::new(FetchState {
                status: FetchStatus::Idle,
                result: Arc::new(ResultSet::default()),
            }),
            changes,
        }
    }

    /// Receiver that ticks after every status or result change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub fn status(&self) -> FetchStatus {
        self.state.read().status.clone()
    }

    pub fn result(&self) -> Arc<ResultSet> {
        self.state.read().result.clone()
    }

    pub fn latest_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Issue a fetch and wait for it
    pub async fn fetch(&self, filters: FilterState) -> FetchStatus {
        let seq = self.issue();
        self.run(seq, filters).await;
        self.status()
    }

    /// Issue a fetch on a background task. The sequence number is taken
    /// before this returns, so issue order is call order.
    pub fn spawn_fetch(self: &Arc<Self>, filters: FilterState) -> JoinHandle<()> {
        let seq = self.issue();
        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.run(seq, filters).await;
        })
    }

    async fn run(&self, seq: u64, filters: FilterState) {
        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
            if seq != self.latest_issued() {
                debug!("Fetch #{} superseded during debounce", seq);
                return;
            }
        }

        if !self.set_loading(seq) {
            return;
        }

        info!("Fetching stock data #{} from {}", seq, self.backend.name());
        let result = self.backend.fetch_stock_data(&filters).await;
        self.apply(seq, result);
    }

    fn set_loading(&self, seq: u64) -> bool {
        {
            let mut state = self.state.write();
            if seq != self.latest_issued() {
                return false;
            }
            state.status = FetchStatus::Loading;
        }
        self.notify();
        true
    }

    /// Apply a response. Returns false when a newer fetch has been issued.
    fn apply(&self, seq: u64, result: Result<Vec<RawStockRecord>>) -> bool {
        {
            let mut state = self.state.write();

            let latest = self.latest_issued();
            if seq != latest {
                debug!("Discarding stale response #{} (latest is #{})", seq, latest);
                return false;
            }

            match result {
                Ok(records) => {
                    info!("Fetched {} stock rows (#{})", records.len(), seq);
                    state.result = Arc::new(ResultSet {
                        seq,
                        rows: map_rows(&records),
                        fetched_at: Some(Utc::now()),
                    });
                    state.status = FetchStatus::Success;
                }
                Err(e) => {
                    // previous result stays in memory, hidden behind the error
                    if e.is_fetch_failure() {
                        warn!("Stock data request #{} failed: {}", seq, e);
                    } else {
                        error!("Error fetching stock data (#{}): {}", seq, e);
                    }
                    state.status = FetchStatus::Error(FETCH_FAILED_MESSAGE.to_string());
                }
            }
        }
        self.notify();
        true
    }

    fn notify(&self) {
        self.changes.send_modify(|tick| *tick += 1);
    }
}
