//! Data-plausibility checks
//!
//! These never reject a profile. They flag figures that are legal but
//! unusual enough that the operator should confirm them before the
//! analysis runs.

use crate::model::{PlausibilityWarning, RetirementProfile};

pub const MIN_USUAL_AGE: u32 = 50;
pub const MAX_USUAL_AGE: u32 = 100;
/// Largest relative change from the prior-year IRA total before warning
pub const MAX_BALANCE_SHIFT: f64 = 0.50;
/// Largest emergency expense as a share of the pre-expense portfolio
pub const MAX_EMERGENCY_SHARE: f64 = 0.20;
/// Largest first-year withdrawal as a share of the portfolio
pub const MAX_WITHDRAWAL_RATE: f64 = 0.10;

/// Warnings for `profile` given the year's planned withdrawal
pub fn check_plausibility(
    profile: &RetirementProfile,
    planned_withdrawal: f64,
) -> Vec<PlausibilityWarning> {
    let mut warnings = Vec::new();

    if !(MIN_USUAL_AGE..=MAX_USUAL_AGE).contains(&profile.age) {
        warnings.push(PlausibilityWarning::UnusualAge { age: profile.age });
    }

    // Compare balances as they stood before the one-time expense
    let current_total = profile.total_portfolio();
    let pre_expense_total = current_total + profile.emergency_expense;
    let prior = profile.prior_year_ira_total;
    if prior > 0.0 && ((pre_expense_total - prior) / prior).abs() > MAX_BALANCE_SHIFT {
        warnings.push(PlausibilityWarning::BalanceShift {
            prior_year_total: prior,
            current_total: pre_expense_total,
        });
    }

    if profile.emergency_expense > pre_expense_total * MAX_EMERGENCY_SHARE {
        warnings.push(PlausibilityWarning::LargeEmergencyExpense {
            expense: profile.emergency_expense,
            portfolio: pre_expense_total,
        });
    }

    if planned_withdrawal > current_total * MAX_WITHDRAWAL_RATE {
        warnings.push(PlausibilityWarning::HighWithdrawalRate {
            withdrawal: planned_withdrawal,
            portfolio: current_total,
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FilingStatus, StateTaxProfile};

    fn profile() -> RetirementProfile {
        RetirementProfile {
            name: "Pat".to_string(),
            age: 74,
            birth_year: 1950,
            filing_status: FilingStatus::Joint,
            monthly_spending: 4_000.0,
            social_security: 24_000.0,
            tax_exempt_interest: 0.0,
            cash_balance: 200_000.0,
            stock_balance: 800_000.0,
            prior_year_ira_total: 900_000.0,
            state: StateTaxProfile::no_tax("Florida", "FL"),
            emergency_expense: 0.0,
        }
    }

    #[test]
    fn test_typical_profile_has_no_warnings() {
        assert!(check_plausibility(&profile(), 48_000.0).is_empty());
    }

    #[test]
    fn test_unusual_age() {
        let mut young = profile();
        young.age = 45;
        assert_eq!(
            check_plausibility(&young, 48_000.0),
            vec![PlausibilityWarning::UnusualAge { age: 45 }]
        );
    }

    #[test]
    fn test_balance_shift() {
        let mut p = profile();
        p.prior_year_ira_total = 500_000.0;
        let warnings = check_plausibility(&p, 48_000.0);
        assert!(matches!(
            warnings.as_slice(),
            [PlausibilityWarning::BalanceShift { .. }]
        ));

        // No prior figure means nothing to compare against
        p.prior_year_ira_total = 0.0;
        assert!(check_plausibility(&p, 48_000.0).is_empty());
    }

    #[test]
    fn test_large_emergency_expense_measured_before_payment() {
        let mut p = profile();
        // 250,000 paid out of a 1,000,000 portfolio
        p.emergency_expense = 250_000.0;
        p.cash_balance = 0.0;
        p.stock_balance = 750_000.0;
        let warnings = check_plausibility(&p, 48_000.0);
        assert_eq!(
            warnings,
            vec![PlausibilityWarning::LargeEmergencyExpense {
                expense: 250_000.0,
                portfolio: 1_000_000.0,
            }]
        );
    }

    #[test]
    fn test_high_withdrawal_rate() {
        let warnings = check_plausibility(&profile(), 120_000.0);
        assert_eq!(
            warnings,
            vec![PlausibilityWarning::HighWithdrawalRate {
                withdrawal: 120_000.0,
                portfolio: 1_000_000.0,
            }]
        );
    }
}
