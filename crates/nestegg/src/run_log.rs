//! Append-only CSV record of completed analyses

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use nestegg_core::model::AnalysisReport;
use serde::Serialize;

use crate::error::RunLogError;

/// One row of the run log. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub timestamp: String,
    pub person: String,
    pub state: String,
    pub age: u32,
    pub total_portfolio: f64,
    pub cash_balance: f64,
    pub annual_withdrawal: f64,
    pub total_tax: f64,
    pub market_return_1y: f64,
    pub action: &'static str,
}

impl RunRecord {
    pub fn from_report(report: &AnalysisReport, at: Timestamp) -> Self {
        Self {
            timestamp: at.to_string(),
            person: report.person.clone(),
            state: report.state.clone(),
            age: report.age,
            total_portfolio: round_cents(report.total_portfolio),
            cash_balance: round_cents(report.cash_balance),
            annual_withdrawal: round_cents(report.plan.ira_withdrawal),
            total_tax: round_cents(report.taxes.total),
            market_return_1y: report.market.one_year_return,
            action: report.action.code(),
        }
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `record`, writing the header first if the file is new or empty
    pub fn append(&self, record: &RunRecord) -> Result<(), RunLogError> {
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}
