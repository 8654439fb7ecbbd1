//! Required minimum distributions

use crate::model::{AnnualWithdrawalPlan, RmdTable};

/// Age at which RMDs begin under SECURE 2.0
pub fn rmd_start_age(birth_year: i16) -> u32 {
    match birth_year {
        ..=1950 => 72,
        1951..=1959 => 73,
        _ => 75,
    }
}

/// Prior-year-end balance divided by the divisor, 0 when no RMD applies
pub fn required_amount(prior_year_balance: f64, factor: f64) -> f64 {
    if factor > 0.0 {
        prior_year_balance.max(0.0) / factor
    } else {
        0.0
    }
}

/// The year's IRA withdrawal: planned spending, raised to the RMD if needed
pub fn withdrawal_plan(
    planned_spend: f64,
    prior_year_balance: f64,
    age: u32,
    start_age: u32,
    table: &RmdTable,
) -> AnnualWithdrawalPlan {
    let rmd_factor = table.factor(age, start_age);
    let rmd_amount = required_amount(prior_year_balance, rmd_factor);
    AnnualWithdrawalPlan {
        planned_spend,
        ira_withdrawal: planned_spend.max(rmd_amount),
        rmd_amount,
        rmd_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RmdStatus;

    #[test]
    fn test_start_age_schedule() {
        assert_eq!(rmd_start_age(1945), 72);
        assert_eq!(rmd_start_age(1950), 72);
        assert_eq!(rmd_start_age(1951), 73);
        assert_eq!(rmd_start_age(1959), 73);
        assert_eq!(rmd_start_age(1960), 75);
        assert_eq!(rmd_start_age(1975), 75);
    }

    #[test]
    fn test_required_amount() {
        assert!((required_amount(900_000.0, 25.5) - 35_294.117_647).abs() < 1e-3);
        assert_eq!(required_amount(900_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_plan_before_start_age() {
        let table = RmdTable::irs_uniform_lifetime();
        let plan = withdrawal_plan(40_000.0, 1_000_000.0, 70, 73, &table);
        assert_eq!(plan.ira_withdrawal, 40_000.0);
        assert_eq!(plan.rmd_amount, 0.0);
        assert_eq!(plan.rmd_status(), RmdStatus::NotRequired);
    }

    #[test]
    fn test_plan_raised_to_rmd() {
        let table = RmdTable::irs_uniform_lifetime();
        // 1,000,000 / 12.2 at age 90
        let plan = withdrawal_plan(30_000.0, 1_000_000.0, 90, 73, &table);
        assert!((plan.ira_withdrawal - 81_967.21).abs() < 0.01, "got {}", plan.ira_withdrawal);
        assert_eq!(plan.rmd_status(), RmdStatus::Increased);
    }
}
