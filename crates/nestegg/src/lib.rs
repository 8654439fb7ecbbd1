//! Command-line front end for the nestegg engine
//!
//! Loads retiree profiles from YAML, fetches (or falls back to) market
//! figures, runs each analysis and appends the result to a CSV run log.

pub mod error;
pub mod logging;
pub mod market_data;
pub mod report;
pub mod run_log;
pub mod session;
pub mod settings;
pub mod storage;

pub use logging::init_logging;
pub use session::{Session, SessionOptions, SessionSummary};
pub use storage::DataDirectory;
