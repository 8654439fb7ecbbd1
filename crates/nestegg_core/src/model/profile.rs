//! Retiree input snapshot
//!
//! `RetirementProfileInput` is what callers deserialize or build;
//! `finalize` validates it, resolves the state, applies any one-time
//! emergency expense and freezes the result as a `RetirementProfile`.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::model::state_profile::StateTaxProfile;
use crate::model::state_table::StateTaxTable;
use crate::model::tax::FilingStatus;

/// State definition for a jurisdiction missing from the built-in table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomStateInput {
    pub flat_rate: f64,
    #[serde(default)]
    pub std_deduction: f64,
    #[serde(default)]
    pub social_security_taxable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementProfileInput {
    /// Person label written to the run log
    pub name: String,
    pub age: u32,
    pub birth_year: i16,
    #[serde(default)]
    pub filing_status: FilingStatus,
    pub monthly_spending: f64,
    #[serde(default)]
    pub social_security: f64,
    #[serde(default)]
    pub tax_exempt_interest: f64,
    pub cash_balance: f64,
    pub stock_balance: f64,
    #[serde(default)]
    pub prior_year_ira_total: f64,
    /// State name or two-letter abbreviation
    pub state: String,
    #[serde(default)]
    pub custom_state: Option<CustomStateInput>,
    /// One-time expense paid before the analysis starts
    #[serde(default)]
    pub emergency_expense: f64,
}

/// Frozen per-analysis snapshot consumed by the calculators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetirementProfile {
    pub name: String,
    pub age: u32,
    pub birth_year: i16,
    pub filing_status: FilingStatus,
    pub monthly_spending: f64,
    pub social_security: f64,
    pub tax_exempt_interest: f64,
    pub cash_balance: f64,
    pub stock_balance: f64,
    pub prior_year_ira_total: f64,
    pub state: StateTaxProfile,
    /// Emergency expense already taken out of the balances above
    pub emergency_expense: f64,
}

impl RetirementProfile {
    #[must_use]
    pub fn annual_spending(&self) -> f64 {
        self.monthly_spending * 12.0
    }

    #[must_use]
    pub fn total_portfolio(&self) -> f64 {
        self.cash_balance + self.stock_balance
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<f64, ProfileError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ProfileError::InvalidAmount { field, value })
    }
}

impl RetirementProfileInput {
    pub fn finalize(self, states: &StateTaxTable) -> Result<RetirementProfile, ProfileError> {
        if self.age == 0 || self.age > 120 {
            return Err(ProfileError::InvalidAge(self.age));
        }
        let monthly_spending = check_amount("monthly_spending", self.monthly_spending)?;
        let social_security = check_amount("social_security", self.social_security)?;
        let tax_exempt_interest = check_amount("tax_exempt_interest", self.tax_exempt_interest)?;
        let mut cash_balance = check_amount("cash_balance", self.cash_balance)?;
        let mut stock_balance = check_amount("stock_balance", self.stock_balance)?;
        let prior_year_ira_total = check_amount("prior_year_ira_total", self.prior_year_ira_total)?;
        let emergency_expense = check_amount("emergency_expense", self.emergency_expense)?;

        let state = match (states.lookup(&self.state), self.custom_state) {
            (Some(profile), _) => profile.clone(),
            (None, Some(custom)) => {
                check_amount("custom_state.flat_rate", custom.flat_rate)?;
                check_amount("custom_state.std_deduction", custom.std_deduction)?;
                StateTaxProfile::custom(
                    self.state.trim(),
                    custom.flat_rate,
                    custom.std_deduction,
                    custom.social_security_taxable,
                )
            }
            (None, None) => return Err(ProfileError::UnknownState(self.state)),
        };

        if emergency_expense > 0.0 {
            let available = cash_balance + stock_balance;
            if emergency_expense > available {
                return Err(ProfileError::EmergencyExceedsPortfolio {
                    expense: emergency_expense,
                    available,
                });
            }
            let from_cash = emergency_expense.min(cash_balance);
            cash_balance -= from_cash;
            stock_balance -= emergency_expense - from_cash;
        }

        Ok(RetirementProfile {
            name: self.name,
            age: self.age,
            birth_year: self.birth_year,
            filing_status: self.filing_status,
            monthly_spending,
            social_security,
            tax_exempt_interest,
            cash_balance,
            stock_balance,
            prior_year_ira_total,
            state,
            emergency_expense,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::state_profile::StateTaxMethod;

    fn input() -> RetirementProfileInput {
        RetirementProfileInput {
            name: "Pat".to_string(),
            age: 70,
            birth_year: 1955,
            filing_status: FilingStatus::Single,
            monthly_spending: 3_000.0,
            social_security: 20_000.0,
            tax_exempt_interest: 0.0,
            cash_balance: 50_000.0,
            stock_balance: 450_000.0,
            prior_year_ira_total: 480_000.0,
            state: "TX".to_string(),
            custom_state: None,
            emergency_expense: 0.0,
        }
    }

    #[test]
    fn test_finalize_resolves_state() {
        let profile = input().finalize(&StateTaxTable::us_2024()).unwrap();
        assert_eq!(profile.state.name, "Texas");
        assert_eq!(profile.annual_spending(), 36_000.0);
        assert_eq!(profile.total_portfolio(), 500_000.0);
    }

    #[test]
    fn test_emergency_expense_drains_cash_then_stocks() {
        let mut raw = input();
        raw.emergency_expense = 80_000.0;
        let profile = raw.finalize(&StateTaxTable::us_2024()).unwrap();
        assert_eq!(profile.cash_balance, 0.0);
        assert_eq!(profile.stock_balance, 420_000.0);
        assert_eq!(profile.emergency_expense, 80_000.0);
    }

    #[test]
    fn test_emergency_expense_larger_than_portfolio() {
        let mut raw = input();
        raw.emergency_expense = 600_000.0;
        let err = raw.finalize(&StateTaxTable::us_2024()).unwrap_err();
        assert!(matches!(err, ProfileError::EmergencyExceedsPortfolio { .. }));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut raw = input();
        raw.cash_balance = -1.0;
        let err = raw.finalize(&StateTaxTable::us_2024()).unwrap_err();
        assert_eq!(
            err,
            ProfileError::InvalidAmount {
                field: "cash_balance",
                value: -1.0
            }
        );
    }

    #[test]
    fn test_unknown_state_uses_custom_block() {
        let mut raw = input();
        raw.state = "Puerto Rico".to_string();
        let err = raw.clone().finalize(&StateTaxTable::us_2024()).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownState(_)));

        raw.custom_state = Some(CustomStateInput {
            flat_rate: 0.04,
            std_deduction: 3_000.0,
            social_security_taxable: true,
        });
        let profile = raw.finalize(&StateTaxTable::us_2024()).unwrap();
        assert_eq!(profile.state.method, StateTaxMethod::Flat { rate: 0.04 });
        assert_eq!(profile.state.joint_std_deduction, 6_000.0);
        assert_eq!(profile.state.social_security_exempt_pct, 0.0);
    }
}
