//! Retirement withdrawal and tax engine
//!
//! This crate answers the yearly questions a retiree drawing down an IRA
//! has to settle:
//! - How much must be withdrawn (planned spending vs. the RMD)
//! - What that withdrawal costs in federal and state income tax
//! - How much cash to hold against a down market (the glide path)
//! - How likely the portfolio is to last, by Monte Carlo over history
//!
//! ```ignore
//! use nestegg_core::analysis::analyze;
//! use nestegg_core::config::EngineConfig;
//! use nestegg_core::model::ManualQuote;
//!
//! let config = EngineConfig::default();
//! let profile = input.finalize(&config.states)?;
//! let market = ManualQuote::default().into_snapshot("SPY");
//! let report = analyze(&profile, &market, 2025, &config)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Calculators
// ============================================================================

pub mod analysis;
pub mod error;
pub mod federal;
pub mod glide_path;
pub mod rmd;
pub mod simulation;
pub mod social_security;
pub mod state_tax;
pub mod taxes;
pub mod validation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::analyze;
pub use config::EngineConfig;
pub use error::{AnalysisError, ConfigError, ProfileError, SimulationError};
