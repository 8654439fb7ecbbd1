//! Errors from the CLI's collaborators: files on disk, the quote provider
//! and the run log.

use std::fmt;
use std::time::Duration;

/// Errors reading or parsing YAML from the data directory
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// Invalid YAML or a field of the wrong type
    Parse(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {msg}"),
            StorageError::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Failure to obtain a quote from the market-data provider
#[derive(Debug)]
pub enum MarketDataError {
    Http(reqwest::Error),
    /// Provider did not answer within the fetch timeout
    Timeout(Duration),
    /// Response parsed but lacked a required figure
    MissingData(&'static str),
}

impl fmt::Display for MarketDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketDataError::Http(e) => write!(f, "quote request failed: {e}"),
            MarketDataError::Timeout(limit) => {
                write!(f, "quote request timed out after {}s", limit.as_secs_f64())
            }
            MarketDataError::MissingData(what) => write!(f, "quote response missing {what}"),
        }
    }
}

impl std::error::Error for MarketDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarketDataError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        MarketDataError::Http(err)
    }
}

/// Failure appending to the CSV run log
#[derive(Debug)]
pub enum RunLogError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for RunLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunLogError::Io(e) => write!(f, "run log I/O error: {e}"),
            RunLogError::Csv(e) => write!(f, "run log CSV error: {e}"),
        }
    }
}

impl std::error::Error for RunLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunLogError::Io(e) => Some(e),
            RunLogError::Csv(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for RunLogError {
    fn from(err: std::io::Error) -> Self {
        RunLogError::Io(err)
    }
}

impl From<csv::Error> for RunLogError {
    fn from(err: csv::Error) -> Self {
        RunLogError::Csv(err)
    }
}
