//! State income tax

use crate::model::{FilingStatus, StateTaxBreakdown, StateTaxMethod, StateTaxProfile};
use crate::taxes::bracket_tax;

/// State tax on the year's withdrawal and benefits.
///
/// Malformed profiles (flat rate at or below zero, progressive with no
/// brackets) compute zero tax; `StateTaxProfile::validate` reports them.
pub fn state_tax(
    withdrawal: f64,
    social_security: f64,
    status: FilingStatus,
    profile: &StateTaxProfile,
) -> StateTaxBreakdown {
    if !profile.has_income_tax() {
        return StateTaxBreakdown::default();
    }

    let exempt_share = (profile.social_security_exempt_pct / 100.0).clamp(0.0, 1.0);
    let taxable_ss = social_security * (1.0 - exempt_share);
    let taxable_withdrawal = profile.retirement_exclusion.taxable_portion(withdrawal);
    let deduction = match status {
        FilingStatus::Single => profile.single_std_deduction,
        FilingStatus::Joint => profile.joint_std_deduction,
    };
    let taxable_income = (taxable_withdrawal + taxable_ss - deduction).max(0.0);

    let tax = match &profile.method {
        StateTaxMethod::NoTax => 0.0,
        StateTaxMethod::Flat { rate } if *rate > 0.0 => taxable_income * rate,
        StateTaxMethod::Progressive { brackets } if !brackets.is_empty() => {
            bracket_tax(taxable_income, brackets)
        }
        _ => 0.0,
    };

    StateTaxBreakdown {
        taxable_income,
        tax,
    }
}
