//! Screener commands
//!
//! Operations exposed to the terminal front end. Filter edits return the
//! re-fetch they triggered so callers can wait on it when they need to.

pub mod companies;
pub mod filters;
pub mod stocks;
