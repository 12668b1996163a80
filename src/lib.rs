//! S&P 500 Stock Screener
//!
//! Terminal client for a technical-indicator screening API. Filter ranges
//! on Williams %R, EMA-smoothed Williams %R and RSI are sent to the backend,
//! and the matching rows are shown in a sortable, paginated table.

pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod services;
pub mod state;
pub mod terminal;
pub mod view;

use config::ScreenerConfig;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging, load configuration and run the terminal session
pub async fn run() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the table on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_screener=info,stock_screener_lib=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting S&P 500 Stock Screener...");

    let config = ScreenerConfig::from_env()?;
    let app_state = Arc::new(AppState::new(config)?);

    tracing::info!("Application state initialized");

    terminal::run_terminal(app_state).await
}
