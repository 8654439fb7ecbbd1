//! Tax types shared by the federal and state calculators
//!
//! The calculation logic lives in `taxes`, `federal` and `state_tax`.

use serde::{Deserialize, Serialize};

/// A single bracket in a progressive tax schedule.
///
/// `threshold` is the upper edge of the bracket: income up to (and including)
/// the threshold is taxed at `rate`, anything above spills into the next
/// bracket. The final bracket of a schedule uses `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: f64,
    /// Marginal rate for income in this bracket (e.g., 0.22 for 22%)
    pub rate: f64,
}

impl TaxBracket {
    #[must_use]
    pub const fn new(threshold: f64, rate: f64) -> Self {
        Self { threshold, rate }
    }

    /// Open-ended top bracket
    #[must_use]
    pub const fn top(rate: f64) -> Self {
        Self {
            threshold: f64::INFINITY,
            rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    Joint,
}

impl FilingStatus {
    pub fn label(self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::Joint => "Married filing jointly",
        }
    }
}

/// Federal side of a [`TaxResult`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FederalTaxBreakdown {
    pub provisional_income: f64,
    pub taxable_social_security: f64,
    pub standard_deduction: f64,
    pub taxable_income: f64,
    pub marginal_rate: f64,
    pub tax: f64,
}

/// State side of a [`TaxResult`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateTaxBreakdown {
    pub taxable_income: f64,
    pub tax: f64,
}

/// Combined federal + state tax for one year of withdrawals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub federal: FederalTaxBreakdown,
    pub state: StateTaxBreakdown,
    pub total: f64,
    /// Total tax divided by gross income (withdrawal + Social Security)
    pub effective_rate: f64,
}

impl TaxResult {
    #[must_use]
    pub fn new(federal: FederalTaxBreakdown, state: StateTaxBreakdown, gross_income: f64) -> Self {
        let total = federal.tax + state.tax;
        let effective_rate = if gross_income > 0.0 {
            total / gross_income
        } else {
            0.0
        };
        Self {
            federal,
            state,
            total,
            effective_rate,
        }
    }
}
