//! Federal taxation of Social Security benefits
//!
//! Uses the IRS provisional-income test. The dollar thresholds are fixed in
//! statute and are never inflation-indexed, unlike the bracket thresholds
//! and standard deductions in `federal`.

use crate::model::FilingStatus;

/// Maximum share of benefits that can be taxable
pub const MAX_TAXABLE_SHARE: f64 = 0.85;

/// Provisional-income thresholds for one filing status
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProvisionalThresholds {
    /// Below this nothing is taxable
    pub base: f64,
    /// Between `base` and this, 50% of the excess is taxable
    pub upper: f64,
}

impl ProvisionalThresholds {
    pub const fn for_status(status: FilingStatus) -> Self {
        match status {
            FilingStatus::Single => Self {
                base: 25_000.0,
                upper: 34_000.0,
            },
            FilingStatus::Joint => Self {
                base: 32_000.0,
                upper: 44_000.0,
            },
        }
    }

    /// Taxable amount accrued across the full 50% tier
    fn first_tier_cap(self) -> f64 {
        (self.upper - self.base) * 0.5
    }
}

/// Withdrawal + half of benefits + tax-exempt interest
pub fn provisional_income(
    ordinary_income: f64,
    social_security: f64,
    tax_exempt_interest: f64,
) -> f64 {
    ordinary_income + 0.5 * social_security + tax_exempt_interest
}

/// Portion of `social_security` subject to federal income tax
pub fn taxable_social_security(
    ordinary_income: f64,
    social_security: f64,
    tax_exempt_interest: f64,
    status: FilingStatus,
) -> f64 {
    if social_security <= 0.0 {
        return 0.0;
    }

    let provisional = provisional_income(ordinary_income, social_security, tax_exempt_interest);
    let thresholds = ProvisionalThresholds::for_status(status);

    let taxable = if provisional <= thresholds.base {
        0.0
    } else if provisional <= thresholds.upper {
        (provisional - thresholds.base) * 0.5
    } else {
        thresholds.first_tier_cap() + (provisional - thresholds.upper) * MAX_TAXABLE_SHARE
    };

    taxable.min(social_security * MAX_TAXABLE_SHARE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_middle_tier() {
        // Provisional = 20,000 + 10,000 = 30,000 -> (30,000 - 25,000) * 0.5
        let taxable = taxable_social_security(20_000.0, 20_000.0, 0.0, FilingStatus::Single);
        assert!((taxable - 2_500.0).abs() < 1e-9, "got {taxable}");
    }

    #[test]
    fn test_joint_below_base_is_untaxed() {
        let taxable = taxable_social_security(10_000.0, 30_000.0, 0.0, FilingStatus::Joint);
        assert_eq!(taxable, 0.0);
    }

    #[test]
    fn test_joint_upper_tier() {
        // Provisional = 48,000 + 12,000 = 60,000
        // 6,000 + (60,000 - 44,000) * 0.85 = 19,600, cap 0.85 * 24,000 = 20,400
        let taxable = taxable_social_security(48_000.0, 24_000.0, 0.0, FilingStatus::Joint);
        assert!((taxable - 19_600.0).abs() < 1e-9, "got {taxable}");
    }

    #[test]
    fn test_cap_at_85_percent_of_benefits() {
        let taxable = taxable_social_security(200_000.0, 30_000.0, 0.0, FilingStatus::Single);
        assert!((taxable - 25_500.0).abs() < 1e-9, "got {taxable}");
    }

    #[test]
    fn test_tax_exempt_interest_counts_toward_provisional_income() {
        let without = taxable_social_security(20_000.0, 20_000.0, 0.0, FilingStatus::Single);
        let with = taxable_social_security(20_000.0, 20_000.0, 4_000.0, FilingStatus::Single);
        assert!((with - without - 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_benefits_means_nothing_taxable() {
        assert_eq!(
            taxable_social_security(500_000.0, 0.0, 0.0, FilingStatus::Joint),
            0.0
        );
    }
}
