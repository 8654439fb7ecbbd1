//! Per-jurisdiction income tax rules

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::tax::TaxBracket;

/// How a state computes tax on its taxable income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateTaxMethod {
    NoTax,
    Flat { rate: f64 },
    Progressive { brackets: Vec<TaxBracket> },
}

/// Portion of retirement-account withdrawals a state leaves untaxed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementExclusion {
    #[default]
    None,
    /// The first `n` dollars of withdrawals are excluded
    Amount(f64),
    /// Retirement withdrawals are fully exempt
    Full,
}

impl RetirementExclusion {
    /// Withdrawal amount left taxable after the exclusion
    #[must_use]
    pub fn taxable_portion(self, withdrawal: f64) -> f64 {
        match self {
            RetirementExclusion::None => withdrawal,
            RetirementExclusion::Amount(excluded) => (withdrawal - excluded).max(0.0),
            RetirementExclusion::Full => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTaxProfile {
    pub name: String,
    pub abbreviation: String,
    pub method: StateTaxMethod,
    pub single_std_deduction: f64,
    pub joint_std_deduction: f64,
    #[serde(default)]
    pub retirement_exclusion: RetirementExclusion,
    /// Share of Social Security benefits the state exempts, 0-100
    pub social_security_exempt_pct: f64,
}

impl StateTaxProfile {
    /// A jurisdiction with no personal income tax
    #[must_use]
    pub fn no_tax(name: &str, abbreviation: &str) -> Self {
        Self {
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            method: StateTaxMethod::NoTax,
            single_std_deduction: 0.0,
            joint_std_deduction: 0.0,
            retirement_exclusion: RetirementExclusion::Full,
            social_security_exempt_pct: 100.0,
        }
    }

    #[must_use]
    pub fn flat(
        name: &str,
        abbreviation: &str,
        rate: f64,
        single_std_deduction: f64,
        joint_std_deduction: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            method: StateTaxMethod::Flat { rate },
            single_std_deduction,
            joint_std_deduction,
            retirement_exclusion: RetirementExclusion::None,
            social_security_exempt_pct: 100.0,
        }
    }

    #[must_use]
    pub fn progressive(
        name: &str,
        abbreviation: &str,
        brackets: Vec<TaxBracket>,
        single_std_deduction: f64,
        joint_std_deduction: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            method: StateTaxMethod::Progressive { brackets },
            single_std_deduction,
            joint_std_deduction,
            retirement_exclusion: RetirementExclusion::None,
            social_security_exempt_pct: 100.0,
        }
    }

    /// Profile for a jurisdiction missing from the built-in table.
    ///
    /// A zero `flat_rate` yields a no-tax profile. When
    /// `social_security_taxable` is set the state taxes benefits in full.
    #[must_use]
    pub fn custom(
        name: &str,
        flat_rate: f64,
        std_deduction: f64,
        social_security_taxable: bool,
    ) -> Self {
        let abbreviation: String = name
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .take(2)
            .collect::<String>()
            .to_ascii_uppercase();
        if flat_rate <= 0.0 {
            return Self::no_tax(name, &abbreviation);
        }
        Self::flat(name, &abbreviation, flat_rate, std_deduction, std_deduction * 2.0)
            .with_social_security_exempt_pct(if social_security_taxable { 0.0 } else { 100.0 })
    }

    #[must_use]
    pub fn with_retirement_exclusion(mut self, exclusion: RetirementExclusion) -> Self {
        self.retirement_exclusion = exclusion;
        self
    }

    #[must_use]
    pub fn with_social_security_exempt_pct(mut self, pct: f64) -> Self {
        self.social_security_exempt_pct = pct;
        self
    }

    pub fn has_income_tax(&self) -> bool {
        !matches!(self.method, StateTaxMethod::NoTax)
    }

    /// Check that the profile resolves to exactly one computation path.
    ///
    /// A flat profile with a non-positive rate or a progressive profile
    /// without brackets still computes (to zero tax) but is reported here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.method {
            StateTaxMethod::NoTax => {}
            StateTaxMethod::Flat { rate } => {
                if !(*rate > 0.0 && *rate < 1.0) {
                    return Err(ConfigError::MalformedStateProfile {
                        state: self.name.clone(),
                        reason: format!("flat rate {rate} outside (0, 1)"),
                    });
                }
            }
            StateTaxMethod::Progressive { brackets } => {
                if brackets.is_empty() {
                    return Err(ConfigError::MalformedStateProfile {
                        state: self.name.clone(),
                        reason: "progressive schedule has no brackets".to_string(),
                    });
                }
                crate::taxes::validate_brackets(brackets).map_err(|reason| {
                    ConfigError::MalformedStateProfile {
                        state: self.name.clone(),
                        reason,
                    }
                })?;
            }
        }
        if !(0.0..=100.0).contains(&self.social_security_exempt_pct) {
            return Err(ConfigError::MalformedStateProfile {
                state: self.name.clone(),
                reason: format!(
                    "social security exemption {}% outside 0-100",
                    self.social_security_exempt_pct
                ),
            });
        }
        if self.single_std_deduction < 0.0 || self.joint_std_deduction < 0.0 {
            return Err(ConfigError::MalformedStateProfile {
                state: self.name.clone(),
                reason: "negative standard deduction".to_string(),
            });
        }
        Ok(())
    }
}
