//! Bracket tax engine shared by the federal and state calculators
//!
//! Schedules are ordered by each bracket's upper threshold; the last bracket
//! is open-ended (`f64::INFINITY`).

use crate::model::TaxBracket;

/// Tax owed on `taxable_income` under a progressive schedule.
///
/// Income at or below zero owes nothing. Each bracket taxes the slice of
/// income between the previous threshold and its own threshold.
pub fn bracket_tax(taxable_income: f64, brackets: &[TaxBracket]) -> f64 {
    if taxable_income <= 0.0 || brackets.is_empty() {
        return 0.0;
    }

    let mut tax = 0.0;
    let mut prev_threshold = 0.0;

    for bracket in brackets {
        let taxable_in_bracket = (taxable_income.min(bracket.threshold) - prev_threshold).max(0.0);
        tax += taxable_in_bracket * bracket.rate;

        if taxable_income <= bracket.threshold {
            break;
        }
        prev_threshold = bracket.threshold;
    }

    tax
}

/// Rate applied to the next dollar above `taxable_income`
pub fn marginal_rate(taxable_income: f64, brackets: &[TaxBracket]) -> f64 {
    let income = taxable_income.max(0.0);
    brackets
        .iter()
        .find(|b| income < b.threshold)
        .or(brackets.last())
        .map_or(0.0, |b| b.rate)
}

/// Multiply every finite threshold by `factor` (inflation indexing)
pub fn scale_brackets(brackets: &[TaxBracket], factor: f64) -> Vec<TaxBracket> {
    brackets
        .iter()
        .map(|b| TaxBracket {
            threshold: if b.threshold.is_finite() {
                b.threshold * factor
            } else {
                b.threshold
            },
            rate: b.rate,
        })
        .collect()
}

/// Check ordering and rate bounds of a schedule
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), String> {
    let mut prev = 0.0;
    for (i, bracket) in brackets.iter().enumerate() {
        if !(0.0..1.0).contains(&bracket.rate) {
            return Err(format!("bracket {i} rate {} outside [0, 1)", bracket.rate));
        }
        if bracket.threshold <= prev {
            return Err(format!(
                "bracket {i} threshold {} not above previous {prev}",
                bracket.threshold
            ));
        }
        prev = bracket.threshold;
    }
    match brackets.last() {
        Some(last) if last.threshold.is_infinite() => Ok(()),
        Some(_) => Err("top bracket must be open-ended".to_string()),
        None => Err("schedule has no brackets".to_string()),
    }
}
