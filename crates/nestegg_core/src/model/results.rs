//! Analysis outputs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::market::MarketSnapshot;
use super::tax::TaxResult;

/// How the year's RMD relates to planned spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RmdStatus {
    /// Owner is below their RMD start age
    NotRequired,
    /// Planned spending already withdraws at least the RMD
    Satisfied,
    /// Withdrawal was raised to meet the RMD
    Increased,
}

impl RmdStatus {
    pub fn message(self) -> &'static str {
        match self {
            RmdStatus::NotRequired => "not yet required",
            RmdStatus::Satisfied => "satisfied",
            RmdStatus::Increased => "withdrawal increased to meet RMD",
        }
    }
}

/// One year's IRA withdrawal after applying the RMD floor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualWithdrawalPlan {
    /// Spending the retiree asked for before the RMD floor
    pub planned_spend: f64,
    pub ira_withdrawal: f64,
    pub rmd_amount: f64,
    /// Divisor used for `rmd_amount`; 0.0 before the RMD start age
    pub rmd_factor: f64,
}

impl AnnualWithdrawalPlan {
    #[must_use]
    pub fn rmd_status(&self) -> RmdStatus {
        if self.rmd_factor <= 0.0 {
            RmdStatus::NotRequired
        } else if self.planned_spend >= self.rmd_amount {
            RmdStatus::Satisfied
        } else {
            RmdStatus::Increased
        }
    }
}

/// Probability (percent) that the portfolio is still funded at each milestone age
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurvivalForecast {
    pub trajectories: usize,
    pub by_age: BTreeMap<u32, f64>,
}

impl SurvivalForecast {
    #[must_use]
    pub fn survival_at(&self, age: u32) -> Option<f64> {
        self.by_age.get(&age).copied()
    }

    pub fn milestones(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.by_age.iter().map(|(&age, &pct)| (age, pct))
    }

    /// Survival at the last milestone, or 100% when there are none
    #[must_use]
    pub fn terminal_survival(&self) -> f64 {
        self.by_age.values().last().copied().unwrap_or(100.0)
    }
}

/// Portfolio action suggested for the current year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    /// Market is up and cash is short of target: sell stocks to refill cash
    RefillCashBuffer,
    /// Cash is at target: leave the allocation alone
    HoldAllocation,
    /// Market is down: spend from cash, do not sell stocks
    SpendFromCash,
    /// Cash well above target: move the excess into stocks
    InvestExcessCash,
}

impl RecommendedAction {
    /// Stable code written to the run log
    pub fn code(self) -> &'static str {
        match self {
            RecommendedAction::RefillCashBuffer => "REFILL_CASH_BUFFER",
            RecommendedAction::HoldAllocation => "HOLD_ALLOCATION",
            RecommendedAction::SpendFromCash => "SPEND_FROM_CASH",
            RecommendedAction::InvestExcessCash => "INVEST_EXCESS_CASH",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RecommendedAction::RefillCashBuffer => {
                "Markets are up: sell stocks to top the cash buffer back up to target"
            }
            RecommendedAction::HoldAllocation => "Cash buffer is on target: no trades needed",
            RecommendedAction::SpendFromCash => {
                "Markets are down: fund spending from cash and leave stocks to recover"
            }
            RecommendedAction::InvestExcessCash => {
                "Cash exceeds the buffer target: invest the excess in stocks"
            }
        }
    }
}

/// Data-plausibility issue the operator should confirm before continuing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlausibilityWarning {
    UnusualAge { age: u32 },
    BalanceShift { prior_year_total: f64, current_total: f64 },
    LargeEmergencyExpense { expense: f64, portfolio: f64 },
    HighWithdrawalRate { withdrawal: f64, portfolio: f64 },
}

impl std::fmt::Display for PlausibilityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlausibilityWarning::UnusualAge { age } => {
                write!(f, "age {age} is unusual for a retirement analysis")
            }
            PlausibilityWarning::BalanceShift {
                prior_year_total,
                current_total,
            } => write!(
                f,
                "portfolio of ${current_total:.0} differs sharply from last year's IRA total of ${prior_year_total:.0}"
            ),
            PlausibilityWarning::LargeEmergencyExpense { expense, portfolio } => write!(
                f,
                "emergency expense of ${expense:.0} is a large share of the ${portfolio:.0} portfolio"
            ),
            PlausibilityWarning::HighWithdrawalRate {
                withdrawal,
                portfolio,
            } => write!(
                f,
                "withdrawal of ${withdrawal:.0} is more than 10% of the ${portfolio:.0} portfolio"
            ),
        }
    }
}

/// Everything produced by one end-to-end analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub person: String,
    pub state: String,
    pub age: u32,
    pub rmd_start_age: u32,
    pub total_portfolio: f64,
    pub cash_balance: f64,
    pub stock_balance: f64,
    pub plan: AnnualWithdrawalPlan,
    pub taxes: TaxResult,
    /// Withdrawal plus Social Security minus total tax
    pub after_tax_income: f64,
    pub target_cash_buffer: f64,
    pub market: MarketSnapshot,
    pub dividend_yield_used: f64,
    pub forecast: SurvivalForecast,
    pub action: RecommendedAction,
    pub warnings: Vec<PlausibilityWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rmd_status() {
        let before = AnnualWithdrawalPlan {
            planned_spend: 40_000.0,
            ira_withdrawal: 40_000.0,
            rmd_amount: 0.0,
            rmd_factor: 0.0,
        };
        assert_eq!(before.rmd_status(), RmdStatus::NotRequired);

        let satisfied = AnnualWithdrawalPlan {
            planned_spend: 48_000.0,
            ira_withdrawal: 48_000.0,
            rmd_amount: 35_294.12,
            rmd_factor: 25.5,
        };
        assert_eq!(satisfied.rmd_status(), RmdStatus::Satisfied);
        assert_eq!(satisfied.rmd_status().message(), "satisfied");

        let raised = AnnualWithdrawalPlan {
            planned_spend: 30_000.0,
            ira_withdrawal: 60_000.0,
            rmd_amount: 60_000.0,
            rmd_factor: 16.0,
        };
        assert_eq!(raised.rmd_status(), RmdStatus::Increased);
    }

    #[test]
    fn test_terminal_survival() {
        let mut forecast = SurvivalForecast::default();
        assert_eq!(forecast.terminal_survival(), 100.0);
        forecast.by_age.insert(80, 97.5);
        forecast.by_age.insert(100, 61.2);
        assert_eq!(forecast.terminal_survival(), 61.2);
        assert_eq!(forecast.survival_at(80), Some(97.5));
    }
}
