//! Market inputs: the historical return series, quote snapshots and the
//! single-entry quote cache.

use std::borrow::Cow;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Dividend yield assumed when the quote's yield is missing or implausible
pub const FALLBACK_DIVIDEND_YIELD: f64 = 0.015;

/// Fetched yields at or above this are treated as bad data
pub const MAX_PLAUSIBLE_DIVIDEND_YIELD: f64 = 0.10;

/// Historical annual total-return series sampled by the simulator.
///
/// The simulator walks the series sequentially from a random offset,
/// wrapping at the end, so consecutive historical years stay together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalReturnSeries {
    pub name: Cow<'static, str>,
    /// Calendar year of `returns[0]`
    pub start_year: i16,
    pub returns: Cow<'static, [f64]>,
}

impl Default for HistoricalReturnSeries {
    fn default() -> Self {
        Self::sp500()
    }
}

impl HistoricalReturnSeries {
    #[must_use]
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        start_year: i16,
        returns: impl Into<Cow<'static, [f64]>>,
    ) -> Self {
        Self {
            name: name.into(),
            start_year,
            returns: returns.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Return at `offset`, wrapping around the end of the series.
    ///
    /// Panics on an empty series; callers check `is_empty` first.
    #[must_use]
    pub fn at(&self, offset: usize) -> f64 {
        self.returns[offset % self.returns.len()]
    }

    #[must_use]
    pub fn arithmetic_mean(&self) -> Option<f64> {
        if self.returns.is_empty() {
            return None;
        }
        Some(self.returns.iter().sum::<f64>() / self.returns.len() as f64)
    }

    /// 97 years of S&P 500 total returns starting in 1927
    #[must_use]
    pub fn sp500() -> Self {
        Self::new("S&P 500", 1927, SP_500_ANNUAL_RETURNS)
    }
}

/// Annual S&P 500 total returns 1927-2023 (Shiller data)
pub const SP_500_ANNUAL_RETURNS: &[f64] = &[
    0.1071, 0.3490, 0.4533, -0.0803, -0.1985, -0.3873, -0.0936, 0.5318, -0.0791, 0.5231,
    0.3292, -0.2964, 0.1507, 0.0431, -0.0719, -0.0786, 0.1817, 0.2250, 0.1815, 0.3760, -0.1054,
    0.0309, 0.1032, 0.1677, 0.3240, 0.1990, 0.1397, 0.0222, 0.4375, 0.2781, 0.0684, -0.0571,
    0.3839, 0.0780, 0.0587, 0.1897, -0.0266, 0.2045, 0.1562, 0.1168, -0.0634, 0.1558, 0.1052,
    -0.0765, 0.0667, 0.1332, 0.1763, -0.1457, -0.2023, 0.3722, 0.1162, -0.0793, 0.1570, 0.1623,
    0.2494, -0.0613, 0.2736, 0.1987, 0.0727, 0.2477, 0.3002, -0.0181, 0.1715, 0.2260, -0.0102,
    0.3080, 0.0737, 0.1147, 0.0084, 0.3421, 0.2645, 0.2720, 0.3087, 0.1532, -0.0498, -0.1304,
    -0.1972, 0.2807, 0.0606, 0.1004, 0.1316, -0.0085, -0.3455, 0.3176, 0.1609, 0.0348, 0.1586,
    0.2504, 0.1332, -0.0327, 0.2052, 0.2449, -0.0461, 0.2756, 0.1710, 0.2212, -0.1180,
];

/// Where a [`MarketSnapshot`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Fetched,
    Manual,
}

/// Point-in-time market figures for the portfolio's proxy ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    /// Trailing one-year total return as a fraction
    pub one_year_return: f64,
    /// Trailing twelve-month dividend yield as a fraction
    pub dividend_yield: f64,
    pub current_price: Option<f64>,
    pub source: QuoteSource,
}

impl MarketSnapshot {
    /// Dividend yield the simulator should use for this snapshot.
    ///
    /// Yields outside (0, 10%) are replaced with [`FALLBACK_DIVIDEND_YIELD`].
    #[must_use]
    pub fn simulation_dividend_yield(&self) -> f64 {
        effective_dividend_yield(self.dividend_yield)
    }
}

#[must_use]
pub fn effective_dividend_yield(dividend_yield: f64) -> f64 {
    if dividend_yield > 0.0 && dividend_yield < MAX_PLAUSIBLE_DIVIDEND_YIELD {
        dividend_yield
    } else {
        FALLBACK_DIVIDEND_YIELD
    }
}

/// Operator-supplied market figures used when fetching is disabled or fails
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualQuote {
    pub one_year_return: f64,
    pub dividend_yield: f64,
}

impl Default for ManualQuote {
    fn default() -> Self {
        Self {
            one_year_return: 0.0,
            dividend_yield: FALLBACK_DIVIDEND_YIELD,
        }
    }
}

impl ManualQuote {
    #[must_use]
    pub fn into_snapshot(self, ticker: &str) -> MarketSnapshot {
        MarketSnapshot {
            ticker: ticker.to_string(),
            one_year_return: self.one_year_return,
            dividend_yield: self.dividend_yield,
            current_price: None,
            source: QuoteSource::Manual,
        }
    }
}

/// The most recent successful fetch and when it happened.
///
/// Owned by the caller; staleness is decided against an explicit `now`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteCache {
    pub snapshot: MarketSnapshot,
    pub fetched_at: Timestamp,
}

impl QuoteCache {
    #[must_use]
    pub fn new(snapshot: MarketSnapshot, fetched_at: Timestamp) -> Self {
        Self {
            snapshot,
            fetched_at,
        }
    }

    /// The cached snapshot if it is for `ticker` and younger than `ttl`
    #[must_use]
    pub fn fresh(
        &self,
        ticker: &str,
        now: Timestamp,
        ttl: SignedDuration,
    ) -> Option<&MarketSnapshot> {
        let age = now.duration_since(self.fetched_at);
        let same_ticker = self.snapshot.ticker.eq_ignore_ascii_case(ticker);
        (same_ticker && age >= SignedDuration::ZERO && age < ttl).then_some(&self.snapshot)
    }
}

/// Cache lookup for an optional cache slot
#[must_use]
pub fn cached_quote<'a>(
    cache: Option<&'a QuoteCache>,
    ticker: &str,
    now: Timestamp,
    ttl: SignedDuration,
) -> Option<&'a MarketSnapshot> {
    cache.and_then(|c| c.fresh(ticker, now, ttl))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(dividend_yield: f64) -> MarketSnapshot {
        MarketSnapshot {
            ticker: "SPY".to_string(),
            one_year_return: 0.12,
            dividend_yield,
            current_price: Some(500.0),
            source: QuoteSource::Fetched,
        }
    }

    #[test]
    fn test_series_wraps_around() {
        let series = HistoricalReturnSeries::new("test", 2000, vec![0.1, 0.2, 0.3]);
        assert_eq!(series.at(0), 0.1);
        assert_eq!(series.at(3), 0.1);
        assert_eq!(series.at(5), 0.3);
    }

    #[test]
    fn test_sp500_series_length() {
        let series = HistoricalReturnSeries::sp500();
        assert_eq!(series.len(), 97);
        let mean = series.arithmetic_mean().unwrap();
        assert!(mean > 0.10 && mean < 0.13, "unexpected mean {mean}");
    }

    #[test]
    fn test_dividend_yield_guard() {
        assert_eq!(snapshot(0.013).simulation_dividend_yield(), 0.013);
        assert_eq!(snapshot(0.0).simulation_dividend_yield(), FALLBACK_DIVIDEND_YIELD);
        assert_eq!(snapshot(-0.01).simulation_dividend_yield(), FALLBACK_DIVIDEND_YIELD);
        assert_eq!(snapshot(0.10).simulation_dividend_yield(), FALLBACK_DIVIDEND_YIELD);
        assert_eq!(snapshot(0.25).simulation_dividend_yield(), FALLBACK_DIVIDEND_YIELD);
    }

    #[test]
    fn test_cache_fresh_within_ttl() {
        let fetched_at = Timestamp::from_second(1_700_000_000).unwrap();
        let cache = QuoteCache::new(snapshot(0.013), fetched_at);
        let ttl = SignedDuration::from_mins(5);

        let later = Timestamp::from_second(1_700_000_000 + 299).unwrap();
        assert!(cache.fresh("SPY", later, ttl).is_some());
        assert!(cache.fresh("spy", later, ttl).is_some());
        assert!(cache.fresh("VTI", later, ttl).is_none());

        let expired = Timestamp::from_second(1_700_000_000 + 300).unwrap();
        assert!(cache.fresh("SPY", expired, ttl).is_none());
    }

    #[test]
    fn test_cache_rejects_future_fetch_time() {
        let fetched_at = Timestamp::from_second(1_700_000_100).unwrap();
        let cache = QuoteCache::new(snapshot(0.013), fetched_at);
        let earlier = Timestamp::from_second(1_700_000_000).unwrap();
        assert!(cache.fresh("SPY", earlier, SignedDuration::from_mins(5)).is_none());
        assert!(cached_quote(None, "SPY", earlier, SignedDuration::from_mins(5)).is_none());
    }
}
