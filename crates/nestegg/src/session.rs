//! Analysis session: one analysis per profile file
//!
//! Each analysis runs inside its own error boundary. A bad profile, a
//! declined plausibility prompt or an engine error is reported and the
//! session moves on to the next profile.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use jiff::Timestamp;
use jiff::tz::TimeZone;
use nestegg_core::analyze;
use nestegg_core::config::EngineConfig;
use nestegg_core::model::{AnalysisReport, PlausibilityWarning};
use nestegg_core::validation::check_plausibility;
use tracing::{error, info, warn};

use crate::market_data::QuoteService;
use crate::report::render_report;
use crate::run_log::{RunLog, RunRecord};
use crate::storage::load_profile;

/// How one analysis ended when it did not fail
#[derive(Debug)]
pub enum Outcome {
    Completed(Box<AnalysisReport>),
    /// Operator declined the plausibility warnings
    Cancelled,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub completed: usize,
    pub cancelled: usize,
    pub failed: usize,
}

/// CLI choices that change how a session behaves
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionOptions {
    /// Skip the plausibility confirmation prompt
    pub assume_yes: bool,
    /// Print reports as JSON instead of text
    pub json: bool,
}

pub struct Session<R, W> {
    config: EngineConfig,
    quotes: QuoteService,
    run_log: RunLog,
    runtime: tokio::runtime::Runtime,
    options: SessionOptions,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        config: EngineConfig,
        quotes: QuoteService,
        run_log: RunLog,
        options: SessionOptions,
        input: R,
        output: W,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .enable_io()
            .build()?;
        Ok(Self {
            config,
            quotes,
            run_log,
            runtime,
            options,
            input,
            output,
        })
    }

    /// Analyze every profile in order, never stopping on a failed one
    pub fn run(&mut self, profiles: &[PathBuf]) -> SessionSummary {
        let mut summary = SessionSummary::default();

        for path in profiles {
            match self.analyze_one(path) {
                Ok(Outcome::Completed(_)) => summary.completed += 1,
                Ok(Outcome::Cancelled) => summary.cancelled += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(profile = %path.display(), error = ?e, "analysis failed");
                    let _ = writeln!(
                        self.output,
                        "Analysis of {} failed: {e:#}\n",
                        path.display()
                    );
                }
            }
        }

        info!(
            completed = summary.completed,
            cancelled = summary.cancelled,
            failed = summary.failed,
            "session finished"
        );
        summary
    }

    pub fn analyze_one(&mut self, path: &Path) -> color_eyre::Result<Outcome> {
        let input = load_profile(path)?;
        let profile = input
            .finalize(&self.config.states)
            .wrap_err_with(|| format!("invalid profile {}", path.display()))?;

        let warnings = check_plausibility(&profile, profile.annual_spending());
        if !warnings.is_empty() && !self.confirm(&profile.name, &warnings)? {
            info!(person = %profile.name, "analysis cancelled at plausibility prompt");
            writeln!(self.output, "Skipped {}.\n", profile.name)?;
            return Ok(Outcome::Cancelled);
        }

        let now = Timestamp::now();
        let market = self.runtime.block_on(self.quotes.current(now));
        let year = now.to_zoned(TimeZone::system()).year();

        let report = analyze(&profile, &market, year, &self.config)
            .wrap_err_with(|| format!("analysis of {} failed", profile.name))?;

        if self.options.json {
            writeln!(self.output, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            writeln!(self.output, "{}", render_report(&report))?;
        }

        if let Err(e) = self.run_log.append(&RunRecord::from_report(&report, now)) {
            warn!(
                path = %self.run_log.path().display(),
                error = %e,
                "failed to append run log"
            );
        }

        Ok(Outcome::Completed(Box::new(report)))
    }

    /// Show `warnings` and ask whether to continue
    fn confirm(&mut self, person: &str, warnings: &[PlausibilityWarning]) -> io::Result<bool> {
        for warning in warnings {
            warn!(person, %warning, "plausibility warning");
        }
        if self.options.assume_yes {
            return Ok(true);
        }

        writeln!(self.output, "Please check the figures for {person}:")?;
        for warning in warnings {
            writeln!(self.output, "  - {warning}")?;
        }
        write!(self.output, "Continue with this analysis? [y/N] ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}
