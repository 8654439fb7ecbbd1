//! Operator settings loaded from `settings.yaml`
//!
//! Every field is optional in the file; missing fields take the defaults
//! below. Command-line flags override them for a single run.

use std::time::Duration;

use jiff::SignedDuration;
use nestegg_core::config::{DEFAULT_INFLATION_RATE, DEFAULT_TRAJECTORIES, EngineConfig};
use nestegg_core::model::ManualQuote;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TICKER: &str = "SPY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub inflation_rate: f64,
    /// Year the built-in federal schedule is denominated in
    pub base_year: i16,
    pub trajectories: usize,
    /// Fixed master seed; a fresh random seed is drawn per run when unset
    pub seed: Option<u64>,
    /// Proxy ticker for the stock allocation
    pub ticker: String,
    pub fetch_timeout_secs: u64,
    pub cache_ttl_secs: i64,
    /// Figures used when fetching is disabled or fails
    pub manual_quote: ManualQuote,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inflation_rate: DEFAULT_INFLATION_RATE,
            base_year: 2024,
            trajectories: DEFAULT_TRAJECTORIES,
            seed: None,
            ticker: DEFAULT_TICKER.to_string(),
            fetch_timeout_secs: 8,
            cache_ttl_secs: 5 * 60,
            manual_quote: ManualQuote::default(),
        }
    }
}

impl Settings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn cache_ttl(&self) -> SignedDuration {
        SignedDuration::from_secs(self.cache_ttl_secs)
    }

    /// Engine configuration for one run with the given master seed
    pub fn engine_config(&self, seed: u64) -> EngineConfig {
        EngineConfig::default()
            .with_inflation_rate(self.inflation_rate)
            .with_base_year(self.base_year)
            .with_trajectories(self.trajectories)
            .with_seed(seed)
    }
}
