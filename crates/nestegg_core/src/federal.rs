//! Federal income tax on IRA withdrawals plus Social Security

use crate::config::FederalTaxParams;
use crate::model::{FederalTaxBreakdown, FilingStatus};
use crate::social_security::{provisional_income, taxable_social_security};
use crate::taxes::{bracket_tax, marginal_rate, scale_brackets};

/// Federal tax for one year.
///
/// Brackets and the standard deduction (including the over-65 addition) are
/// indexed from `params.base_year` to `current_year`. Social Security
/// thresholds are not indexed.
pub fn federal_tax(
    withdrawal: f64,
    social_security: f64,
    tax_exempt_interest: f64,
    status: FilingStatus,
    current_year: i16,
    params: &FederalTaxParams,
) -> FederalTaxBreakdown {
    let factor = params.index_factor(current_year);

    let taxable_ss =
        taxable_social_security(withdrawal, social_security, tax_exempt_interest, status);
    let standard_deduction = params.base_std_deduction(status) * factor;
    let taxable_income = (withdrawal + taxable_ss - standard_deduction).max(0.0);

    let brackets = scale_brackets(params.brackets(status), factor);
    let tax = bracket_tax(taxable_income, &brackets);

    FederalTaxBreakdown {
        provisional_income: provisional_income(withdrawal, social_security, tax_exempt_interest),
        taxable_social_security: taxable_ss,
        standard_deduction,
        taxable_income,
        marginal_rate: marginal_rate(taxable_income, &brackets),
        tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_withdrawal_only_base_year() {
        let params = FederalTaxParams::default();
        let result = federal_tax(40_000.0, 0.0, 0.0, FilingStatus::Joint, 2024, &params);

        assert_eq!(result.taxable_social_security, 0.0);
        assert!((result.standard_deduction - 32_300.0).abs() < 1e-9);
        assert!((result.taxable_income - 7_700.0).abs() < 1e-9);
        assert!(
            (result.tax - 770.0).abs() < 0.01,
            "Expected 770, got {}",
            result.tax
        );
        assert_eq!(result.marginal_rate, 0.10);
    }

    #[test]
    fn test_income_below_deduction_owes_nothing() {
        let params = FederalTaxParams::default();
        let result = federal_tax(10_000.0, 0.0, 0.0, FilingStatus::Single, 2024, &params);
        assert_eq!(result.taxable_income, 0.0);
        assert_eq!(result.tax, 0.0);
    }

    #[test]
    fn test_indexing_shrinks_tax_on_constant_income() {
        let params = FederalTaxParams::default();
        let now = federal_tax(80_000.0, 0.0, 0.0, FilingStatus::Single, 2024, &params);
        let later = federal_tax(80_000.0, 0.0, 0.0, FilingStatus::Single, 2030, &params);

        let expected_deduction = 16_550.0 * 1.03_f64.powi(6);
        assert!((later.standard_deduction - expected_deduction).abs() < 1e-6);
        assert!(later.tax < now.tax);
    }

    #[test]
    fn test_years_before_base_are_not_deflated() {
        let params = FederalTaxParams::default();
        let early = federal_tax(60_000.0, 0.0, 0.0, FilingStatus::Joint, 2019, &params);
        let base = federal_tax(60_000.0, 0.0, 0.0, FilingStatus::Joint, 2024, &params);
        assert_eq!(early, base);
    }

    #[test]
    fn test_social_security_adds_to_taxable_income() {
        let params = FederalTaxParams::default();
        // Single: taxable SS 2,500; 20,000 + 2,500 - 16,550 = 5,950 at 10%
        let result = federal_tax(20_000.0, 20_000.0, 0.0, FilingStatus::Single, 2024, &params);
        assert!((result.provisional_income - 30_000.0).abs() < 1e-9);
        assert!((result.taxable_social_security - 2_500.0).abs() < 1e-9);
        assert!((result.tax - 595.0).abs() < 0.01, "Expected 595, got {}", result.tax);
    }
}
