//! Plain-text rendering of analysis reports and the state table

use std::fmt::Write;

use nestegg_core::config::TERMINAL_AGE;
use nestegg_core::model::{AnalysisReport, QuoteSource, StateTaxMethod, StateTaxTable};

fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// `$1,234.56`
pub fn format_currency(value: f64) -> String {
    let total_cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && total_cents > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        group_thousands(total_cents / 100),
        total_cents % 100
    )
}

/// `$1,235`
pub fn format_currency_short(value: f64) -> String {
    let dollars = value.abs().round() as u64;
    let sign = if value < 0.0 && dollars > 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(dollars))
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, r: &AnalysisReport) -> std::fmt::Result {
    writeln!(out, "=== {} ({}, age {}) ===", r.person, r.state, r.age)?;
    writeln!(
        out,
        "Portfolio:        {}  (cash {}, stocks {})",
        format_currency_short(r.total_portfolio),
        format_currency_short(r.cash_balance),
        format_currency_short(r.stock_balance)
    )?;

    writeln!(out)?;
    writeln!(out, "Withdrawal")?;
    writeln!(out, "  Planned spend:  {}", format_currency(r.plan.planned_spend))?;
    if r.plan.rmd_factor > 0.0 {
        writeln!(
            out,
            "  RMD:            {} (divisor {:.1})",
            format_currency(r.plan.rmd_amount),
            r.plan.rmd_factor
        )?;
    } else {
        writeln!(out, "  RMD:            begins at age {}", r.rmd_start_age)?;
    }
    writeln!(out, "  IRA withdrawal: {}", format_currency(r.plan.ira_withdrawal))?;
    writeln!(out, "  RMD status:     {}", r.plan.rmd_status().message())?;

    let fed = &r.taxes.federal;
    writeln!(out)?;
    writeln!(out, "Taxes")?;
    writeln!(
        out,
        "  Federal:        {} (taxable {}, marginal {})",
        format_currency(fed.tax),
        format_currency_short(fed.taxable_income),
        format_percentage(fed.marginal_rate)
    )?;
    writeln!(
        out,
        "    Taxable SS:   {} of provisional income {}",
        format_currency_short(fed.taxable_social_security),
        format_currency_short(fed.provisional_income)
    )?;
    writeln!(out, "  State:          {}", format_currency(r.taxes.state.tax))?;
    writeln!(
        out,
        "  Total:          {} (effective {})",
        format_currency(r.taxes.total),
        format_percentage(r.taxes.effective_rate)
    )?;
    writeln!(out, "  After-tax:      {}", format_currency(r.after_tax_income))?;

    writeln!(out)?;
    let source = match r.market.source {
        QuoteSource::Fetched => "fetched",
        QuoteSource::Manual => "manual",
    };
    writeln!(
        out,
        "Market ({} {}): 1y return {}, dividend yield {} (simulating {})",
        r.market.ticker,
        source,
        format_percentage(r.market.one_year_return),
        format_percentage(r.market.dividend_yield),
        format_percentage(r.dividend_yield_used)
    )?;
    writeln!(
        out,
        "Cash buffer target: {}",
        format_currency_short(r.target_cash_buffer)
    )?;
    writeln!(out, "Action: {} ({})", r.action.code(), r.action.description())?;

    writeln!(out)?;
    writeln!(
        out,
        "Portfolio survival ({} trajectories)",
        r.forecast.trajectories
    )?;
    if r.forecast.by_age.is_empty() {
        writeln!(out, "  no milestones before age {TERMINAL_AGE}")?;
    }
    for (age, pct) in r.forecast.milestones() {
        writeln!(out, "  age {age:>3}: {pct:5.1}%")?;
    }

    if !r.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings")?;
        for warning in &r.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }
    Ok(())
}

/// One line per jurisdiction: name, abbreviation and how it taxes
pub fn render_states(table: &StateTaxTable) -> String {
    let mut out = String::new();
    for profile in table.iter() {
        let method = match &profile.method {
            StateTaxMethod::NoTax => "no income tax".to_string(),
            StateTaxMethod::Flat { rate } => format!("flat {}", format_percentage(*rate)),
            StateTaxMethod::Progressive { brackets } => {
                let top = brackets.last().map_or(0.0, |b| b.rate);
                format!("{} brackets, top {}", brackets.len(), format_percentage(top))
            }
        };
        let _ = writeln!(
            out,
            "{:<2}  {:<22} {}",
            profile.abbreviation, profile.name, method
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestegg_core::analyze;
    use nestegg_core::config::EngineConfig;
    use nestegg_core::model::{FilingStatus, ManualQuote, RetirementProfileInput};

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1_234.5), "$1,234.50");
        assert_eq!(format_currency(35_294.117), "$35,294.12");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(-1_000_000.0), "-$1,000,000.00");
    }

    #[test]
    fn test_format_currency_short() {
        assert_eq!(format_currency_short(148_363.2), "$148,363");
        assert_eq!(format_currency_short(100.0), "$100");
        assert_eq!(format_currency_short(-0.2), "$0");
    }

    fn lee(age: u32, birth_year: i16) -> RetirementProfileInput {
        RetirementProfileInput {
            name: "Lee".to_string(),
            age,
            birth_year,
            filing_status: FilingStatus::Joint,
            monthly_spending: 4_000.0,
            social_security: 24_000.0,
            tax_exempt_interest: 0.0,
            cash_balance: 200_000.0,
            stock_balance: 800_000.0,
            prior_year_ira_total: 900_000.0,
            state: "MA".to_string(),
            custom_state: None,
            emergency_expense: 0.0,
        }
    }

    #[test]
    fn test_report_mentions_key_figures() {
        let config = EngineConfig::default().with_trajectories(200).with_seed(1);
        let profile = lee(74, 1950).finalize(&config.states).unwrap();
        let market = ManualQuote::default().into_snapshot("SPY");
        let report = analyze(&profile, &market, 2024, &config).unwrap();

        let text = render_report(&report);
        assert!(text.contains("=== Lee (Massachusetts, age 74) ==="));
        assert!(text.contains("RMD status:     satisfied"));
        assert!(text.contains("$48,000.00"));
        assert!(text.contains("INVEST_EXCESS_CASH"));
        assert!(text.contains("age 100:"));
    }

    #[test]
    fn test_report_past_last_milestone() {
        let config = EngineConfig::default().with_trajectories(50).with_seed(1);
        let profile = lee(97, 1927).finalize(&config.states).unwrap();
        let market = ManualQuote::default().into_snapshot("SPY");
        let report = analyze(&profile, &market, 2024, &config).unwrap();

        let text = render_report(&report);
        assert!(
            text.contains("Portfolio survival (50 trajectories)\n  no milestones before age 100")
        );
        assert!(!text.contains("age 100:"));
    }

    #[test]
    fn test_state_listing() {
        let text = render_states(&StateTaxTable::us_2024());
        assert_eq!(text.lines().count(), 51);
        assert!(text.contains("MA  Massachusetts          flat 5.00%"));
        assert!(text.contains("FL  Florida                no income tax"));
    }
}
