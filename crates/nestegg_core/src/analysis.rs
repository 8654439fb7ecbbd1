//! End-to-end analysis for one retiree
//!
//! Ties the calculators together: RMD-adjusted withdrawal, federal and state
//! tax, the glide-path cash target, the survival forecast and the
//! recommended action for the year.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::federal::federal_tax;
use crate::glide_path::target_cash_buffer;
use crate::model::{
    AnalysisReport, MarketSnapshot, RecommendedAction, RetirementProfile, TaxResult,
};
use crate::rmd::{rmd_start_age, withdrawal_plan};
use crate::simulation::{SimulationInputs, monte_carlo};
use crate::state_tax::state_tax;
use crate::validation::check_plausibility;

/// Cash above this multiple of the target buffer counts as excess
pub const EXCESS_CASH_MULTIPLE: f64 = 1.25;

/// Action for the year given the trailing market return and the cash position
pub fn recommend_action(
    one_year_return: f64,
    cash_balance: f64,
    target_buffer: f64,
) -> RecommendedAction {
    if one_year_return < 0.0 {
        RecommendedAction::SpendFromCash
    } else if cash_balance < target_buffer {
        if one_year_return > 0.0 {
            RecommendedAction::RefillCashBuffer
        } else {
            RecommendedAction::HoldAllocation
        }
    } else if cash_balance > target_buffer * EXCESS_CASH_MULTIPLE {
        RecommendedAction::InvestExcessCash
    } else {
        RecommendedAction::HoldAllocation
    }
}

/// Run every calculator for `profile` in `current_year`.
///
/// The RMD is sized from the prior-year IRA total when one is given and
/// from the current portfolio otherwise.
pub fn analyze(
    profile: &RetirementProfile,
    market: &MarketSnapshot,
    current_year: i16,
    config: &EngineConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let start_age = rmd_start_age(profile.birth_year);
    let prior_balance = if profile.prior_year_ira_total > 0.0 {
        profile.prior_year_ira_total
    } else {
        profile.total_portfolio()
    };

    let plan = withdrawal_plan(
        profile.annual_spending(),
        prior_balance,
        profile.age,
        start_age,
        &config.rmd_table,
    );
    let withdrawal = plan.ira_withdrawal;

    let federal = federal_tax(
        withdrawal,
        profile.social_security,
        profile.tax_exempt_interest,
        profile.filing_status,
        current_year,
        &config.federal,
    );
    let state = state_tax(
        withdrawal,
        profile.social_security,
        profile.filing_status,
        &profile.state,
    );
    let taxes = TaxResult::new(federal, state, withdrawal + profile.social_security);

    let target_buffer =
        target_cash_buffer(withdrawal, profile.age, config.simulation.inflation_rate);
    let dividend_yield_used = market.simulation_dividend_yield();

    let forecast = monte_carlo(
        &SimulationInputs {
            age: profile.age,
            rmd_start_age: start_age,
            cash_balance: profile.cash_balance,
            stock_balance: profile.stock_balance,
            annual_withdrawal: plan.planned_spend,
            dividend_yield: dividend_yield_used,
        },
        config,
    )?;

    let action = recommend_action(market.one_year_return, profile.cash_balance, target_buffer);

    debug!(
        person = %profile.name,
        withdrawal,
        total_tax = taxes.total,
        action = action.code(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        person: profile.name.clone(),
        state: profile.state.name.clone(),
        age: profile.age,
        rmd_start_age: start_age,
        total_portfolio: profile.total_portfolio(),
        cash_balance: profile.cash_balance,
        stock_balance: profile.stock_balance,
        plan,
        after_tax_income: withdrawal + profile.social_security - taxes.total,
        taxes,
        target_cash_buffer: target_buffer,
        market: market.clone(),
        dividend_yield_used,
        forecast,
        action,
        warnings: check_plausibility(profile, plan.planned_spend),
    })
}
