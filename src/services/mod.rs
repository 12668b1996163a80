//! Services Layer
//!
//! Business logic behind the terminal commands.
//!
//! # Architecture
//!
//! ```text
//! Terminal UI --> Commands --> Services --> ScreenerBackend (HTTP)
//!                                  |
//!                                  +--> ResultSet --> ResultView
//! ```
//!
//! # Services
//!
//! - `ScreenerService` - Stock table fetch lifecycle and result set
//! - `CompanyService` - S&P 500 directory, single-symbol lookup

pub mod company_service;
pub mod screener_service;

pub use company_service::{CompanyListResult, CompanyService, SymbolDataResult};
pub use screener_service::{FetchStatus, ResultSet, ScreenerService, FETCH_FAILED_MESSAGE};
