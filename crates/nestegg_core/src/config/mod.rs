//! Engine configuration
//!
//! `EngineConfig` bundles every static table and parameter the calculators
//! need. It is built once at startup and passed by reference; nothing in the
//! engine reaches for global state.
//!
//! ```ignore
//! use nestegg_core::config::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_inflation_rate(0.025)
//!     .with_trajectories(5_000)
//!     .with_seed(7);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{FilingStatus, HistoricalReturnSeries, RmdTable, StateTaxTable, TaxBracket};
use crate::taxes::validate_brackets;

pub const DEFAULT_INFLATION_RATE: f64 = 0.03;
pub const DEFAULT_TRAJECTORIES: usize = 10_000;
pub const TERMINAL_AGE: u32 = 100;

/// Federal income tax parameters, expressed in base-year dollars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederalTaxParams {
    /// Tax year the dollar amounts below are denominated in
    pub base_year: i16,
    /// Annual rate used to index thresholds and deductions past `base_year`
    pub inflation_rate: f64,
    pub single_brackets: Vec<TaxBracket>,
    pub joint_brackets: Vec<TaxBracket>,
    pub single_std_deduction: f64,
    pub joint_std_deduction: f64,
    /// Additional standard deduction for a single filer 65 or older
    pub over_65_single: f64,
    /// Additional standard deduction per spouse 65 or older, doubled for joint filers
    pub over_65_per_spouse: f64,
}

impl Default for FederalTaxParams {
    /// 2024 US federal schedule
    fn default() -> Self {
        Self {
            base_year: 2024,
            inflation_rate: DEFAULT_INFLATION_RATE,
            single_brackets: vec![
                TaxBracket::new(11_600.0, 0.10),
                TaxBracket::new(47_150.0, 0.12),
                TaxBracket::new(100_525.0, 0.22),
                TaxBracket::new(191_950.0, 0.24),
                TaxBracket::new(243_725.0, 0.32),
                TaxBracket::new(609_350.0, 0.35),
                TaxBracket::top(0.37),
            ],
            joint_brackets: vec![
                TaxBracket::new(23_200.0, 0.10),
                TaxBracket::new(94_300.0, 0.12),
                TaxBracket::new(201_050.0, 0.22),
                TaxBracket::new(383_900.0, 0.24),
                TaxBracket::new(487_450.0, 0.32),
                TaxBracket::new(731_200.0, 0.35),
                TaxBracket::top(0.37),
            ],
            single_std_deduction: 14_600.0,
            joint_std_deduction: 29_200.0,
            over_65_single: 1_950.0,
            over_65_per_spouse: 1_550.0,
        }
    }
}

impl FederalTaxParams {
    pub fn brackets(&self, status: FilingStatus) -> &[TaxBracket] {
        match status {
            FilingStatus::Single => &self.single_brackets,
            FilingStatus::Joint => &self.joint_brackets,
        }
    }

    /// Base standard deduction including the over-65 addition, unindexed
    pub fn base_std_deduction(&self, status: FilingStatus) -> f64 {
        match status {
            FilingStatus::Single => self.single_std_deduction + self.over_65_single,
            FilingStatus::Joint => self.joint_std_deduction + 2.0 * self.over_65_per_spouse,
        }
    }

    /// `(1 + inflation)^(year - base_year)`, never below 1.0
    pub fn index_factor(&self, current_year: i16) -> f64 {
        let years = (i32::from(current_year) - i32::from(self.base_year)).max(0);
        (1.0 + self.inflation_rate).powi(years)
    }
}

/// Monte Carlo parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub trajectories: usize,
    /// Last simulated age (inclusive)
    pub terminal_age: u32,
    /// Growth rate of spending and of the glide-path buffer
    pub inflation_rate: f64,
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            trajectories: DEFAULT_TRAJECTORIES,
            terminal_age: TERMINAL_AGE,
            inflation_rate: DEFAULT_INFLATION_RATE,
            seed: 0,
        }
    }
}

/// Every table and parameter the engine reads
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub federal: FederalTaxParams,
    pub rmd_table: RmdTable,
    pub returns: HistoricalReturnSeries,
    pub states: StateTaxTable,
    pub simulation: SimulationParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            federal: FederalTaxParams::default(),
            rmd_table: RmdTable::irs_uniform_lifetime(),
            returns: HistoricalReturnSeries::sp500(),
            states: StateTaxTable::us_2024(),
            simulation: SimulationParams::default(),
        }
    }
}

impl EngineConfig {
    /// Sets the rate used both for tax indexing and spending growth
    #[must_use]
    pub fn with_inflation_rate(mut self, rate: f64) -> Self {
        self.federal.inflation_rate = rate;
        self.simulation.inflation_rate = rate;
        self
    }

    #[must_use]
    pub fn with_base_year(mut self, year: i16) -> Self {
        self.federal.base_year = year;
        self
    }

    #[must_use]
    pub fn with_trajectories(mut self, trajectories: usize) -> Self {
        self.simulation.trajectories = trajectories;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulation.seed = seed;
        self
    }

    #[must_use]
    pub fn with_returns(mut self, returns: HistoricalReturnSeries) -> Self {
        self.returns = returns;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for rate in [self.federal.inflation_rate, self.simulation.inflation_rate] {
            if !rate.is_finite() || rate <= -1.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "inflation_rate",
                    value: rate,
                    reason: "must be a finite rate above -100%",
                });
            }
        }
        validate_brackets(&self.federal.single_brackets).map_err(ConfigError::InvalidBrackets)?;
        validate_brackets(&self.federal.joint_brackets).map_err(ConfigError::InvalidBrackets)?;
        if self.returns.is_empty() {
            return Err(ConfigError::EmptyHistoricalData);
        }
        if self.simulation.trajectories == 0 {
            return Err(ConfigError::NoTrajectories);
        }
        if let Some(err) = self.states.validate().into_iter().next() {
            return Err(err);
        }
        Ok(())
    }
}
