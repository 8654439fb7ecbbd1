//! Market figures for the portfolio's proxy ticker
//!
//! `QuoteService` owns the single-entry quote cache and decides between a
//! cached quote, a fresh fetch, and the operator's manual figures. A fetch
//! that fails or exceeds the timeout is logged and replaced by the manual
//! quote; it never aborts an analysis.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use nestegg_core::model::{ManualQuote, MarketSnapshot, QuoteCache, QuoteSource, cached_quote};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::MarketDataError;

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Source of live market figures
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch(&self, ticker: &str) -> Result<MarketSnapshot, MarketDataError>;
}

/// Yahoo Finance chart endpoint: one year of daily bars plus dividends
pub struct YahooChartProvider {
    client: reqwest::Client,
}

impl YahooChartProvider {
    pub fn new(timeout: Duration) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; nestegg)")
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl QuoteProvider for YahooChartProvider {
    async fn fetch(&self, ticker: &str) -> Result<MarketSnapshot, MarketDataError> {
        let url = format!("{CHART_URL}/{ticker}");
        let response: ChartResponse = self
            .client
            .get(&url)
            .query(&[("range", "1y"), ("interval", "1d"), ("events", "div")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        snapshot_from_chart(ticker, response)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    indicators: Indicators,
    #[serde(default)]
    events: Option<ChartEvents>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
    #[serde(default)]
    adjclose: Vec<AdjCloseSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseSeries {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    #[serde(default)]
    dividends: BTreeMap<String, Dividend>,
}

#[derive(Debug, Deserialize)]
struct Dividend {
    amount: f64,
}

fn first_and_last(series: &[Option<f64>]) -> Option<(f64, f64)> {
    let mut prices = series.iter().flatten().copied().filter(|p| *p > 0.0);
    let first = prices.next()?;
    let last = prices.last().unwrap_or(first);
    Some((first, last))
}

/// Trailing one-year total return, dividend yield and price from a chart.
///
/// Uses dividend-adjusted closes when present; otherwise the price change
/// plus the dividends paid.
fn snapshot_from_chart(
    ticker: &str,
    response: ChartResponse,
) -> Result<MarketSnapshot, MarketDataError> {
    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or(MarketDataError::MissingData("chart result"))?;

    let closes = result
        .indicators
        .quote
        .first()
        .and_then(|q| first_and_last(&q.close));
    let current_price = result
        .meta
        .regular_market_price
        .or(closes.map(|(_, last)| last))
        .ok_or(MarketDataError::MissingData("current price"))?;

    let dividends: f64 = result
        .events
        .map(|e| e.dividends.values().map(|d| d.amount).sum())
        .unwrap_or(0.0);
    let dividend_yield = if current_price > 0.0 {
        dividends / current_price
    } else {
        0.0
    };

    let adjusted = result
        .indicators
        .adjclose
        .first()
        .and_then(|a| first_and_last(&a.adjclose));
    let one_year_return = match (adjusted, closes) {
        (Some((first, last)), _) => last / first - 1.0,
        (None, Some((first, last))) => (last + dividends) / first - 1.0,
        (None, None) => return Err(MarketDataError::MissingData("price history")),
    };

    Ok(MarketSnapshot {
        ticker: ticker.to_ascii_uppercase(),
        one_year_return,
        dividend_yield,
        current_price: Some(current_price),
        source: QuoteSource::Fetched,
    })
}

/// Fetch with a hard deadline
pub async fn fetch_with_timeout(
    provider: &dyn QuoteProvider,
    ticker: &str,
    limit: Duration,
) -> Result<MarketSnapshot, MarketDataError> {
    tokio::time::timeout(limit, provider.fetch(ticker))
        .await
        .map_err(|_| MarketDataError::Timeout(limit))?
}

/// Session-owned quote source with a single-entry cache
pub struct QuoteService {
    provider: Option<Box<dyn QuoteProvider>>,
    cache: Option<QuoteCache>,
    ticker: String,
    timeout: Duration,
    ttl: SignedDuration,
    manual: ManualQuote,
}

impl QuoteService {
    /// `provider` is `None` in offline mode
    pub fn new(
        provider: Option<Box<dyn QuoteProvider>>,
        ticker: &str,
        timeout: Duration,
        ttl: SignedDuration,
        manual: ManualQuote,
    ) -> Self {
        Self {
            provider,
            cache: None,
            ticker: ticker.to_string(),
            timeout,
            ttl,
            manual,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Market figures as of `now`: cached, fetched, or manual
    pub async fn current(&mut self, now: Timestamp) -> MarketSnapshot {
        if let Some(snapshot) = cached_quote(self.cache.as_ref(), &self.ticker, now, self.ttl) {
            debug!(ticker = %self.ticker, "using cached quote");
            return snapshot.clone();
        }

        let Some(provider) = self.provider.as_deref() else {
            debug!(ticker = %self.ticker, "offline, using manual quote");
            return self.manual.into_snapshot(&self.ticker);
        };

        match fetch_with_timeout(provider, &self.ticker, self.timeout).await {
            Ok(snapshot) => {
                info!(
                    ticker = %snapshot.ticker,
                    one_year_return = snapshot.one_year_return,
                    dividend_yield = snapshot.dividend_yield,
                    "fetched quote"
                );
                self.cache = Some(QuoteCache::new(snapshot.clone(), now));
                snapshot
            }
            Err(e) => {
                warn!(
                    ticker = %self.ticker,
                    error = %e,
                    "quote fetch failed, using manual quote"
                );
                self.manual.into_snapshot(&self.ticker)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        calls: Arc<AtomicUsize>,
        delay: Duration,
        fail: bool,
    }

    impl FixedProvider {
        fn boxed(
            calls: &Arc<AtomicUsize>,
            delay: Duration,
            fail: bool,
        ) -> Box<dyn QuoteProvider> {
            Box::new(Self {
                calls: Arc::clone(calls),
                delay,
                fail,
            })
        }
    }

    #[async_trait]
    impl QuoteProvider for FixedProvider {
        async fn fetch(&self, ticker: &str) -> Result<MarketSnapshot, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(MarketDataError::MissingData("test failure"));
            }
            Ok(MarketSnapshot {
                ticker: ticker.to_string(),
                one_year_return: 0.21,
                dividend_yield: 0.013,
                current_price: Some(510.0),
                source: QuoteSource::Fetched,
            })
        }
    }

    fn manual() -> ManualQuote {
        ManualQuote {
            one_year_return: -0.02,
            dividend_yield: 0.02,
        }
    }

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_second(1_700_000_000 + secs).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_is_cached_for_five_minutes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = QuoteService::new(
            Some(FixedProvider::boxed(&calls, Duration::ZERO, false)),
            "SPY",
            Duration::from_secs(8),
            SignedDuration::from_mins(5),
            manual(),
        );

        let first = service.current(t(0)).await;
        assert_eq!(first.source, QuoteSource::Fetched);
        let again = service.current(t(299)).await;
        assert_eq!(again, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        service.current(t(300)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_manual() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = QuoteService::new(
            Some(FixedProvider::boxed(&calls, Duration::ZERO, true)),
            "SPY",
            Duration::from_secs(8),
            SignedDuration::from_mins(5),
            manual(),
        );

        let snapshot = service.current(t(0)).await;
        assert_eq!(snapshot.source, QuoteSource::Manual);
        assert_eq!(snapshot.one_year_return, -0.02);

        // Failures are not cached
        service.current(t(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_manual() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = QuoteService::new(
            Some(FixedProvider::boxed(&calls, Duration::from_secs(5), false)),
            "SPY",
            Duration::from_millis(20),
            SignedDuration::from_mins(5),
            manual(),
        );

        let snapshot = service.current(t(0)).await;
        assert_eq!(snapshot.source, QuoteSource::Manual);
    }

    #[tokio::test]
    async fn test_offline_never_fetches() {
        let mut service = QuoteService::new(
            None,
            "VTI",
            Duration::from_secs(8),
            SignedDuration::from_mins(5),
            manual(),
        );
        let snapshot = service.current(t(0)).await;
        assert_eq!(snapshot.ticker, "VTI");
        assert_eq!(snapshot.source, QuoteSource::Manual);
        assert_eq!(snapshot.current_price, None);
    }

    #[test]
    fn test_chart_with_adjusted_closes() {
        let json = r#"{"chart":{"result":[{
            "meta":{"regularMarketPrice":110.0},
            "indicators":{
                "quote":[{"close":[100.0,null,105.0,110.0]}],
                "adjclose":[{"adjclose":[98.0,null,104.0,110.0]}]
            },
            "events":{"dividends":{
                "1700000000":{"amount":0.8,"date":1700000000},
                "1710000000":{"amount":0.85,"date":1710000000}
            }}
        }],"error":null}}"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let snapshot = snapshot_from_chart("spy", response).unwrap();

        assert_eq!(snapshot.ticker, "SPY");
        assert!((snapshot.one_year_return - (110.0 / 98.0 - 1.0)).abs() < 1e-12);
        assert!((snapshot.dividend_yield - 0.015).abs() < 1e-12);
        assert_eq!(snapshot.current_price, Some(110.0));
    }

    #[test]
    fn test_chart_without_adjusted_closes_adds_dividends() {
        let json = r#"{"chart":{"result":[{
            "meta":{},
            "indicators":{"quote":[{"close":[100.0,108.0]}]},
            "events":{"dividends":{"1700000000":{"amount":2.0}}}
        }]}}"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let snapshot = snapshot_from_chart("SPY", response).unwrap();

        assert!((snapshot.one_year_return - 0.10).abs() < 1e-12);
        assert_eq!(snapshot.current_price, Some(108.0));
    }

    #[test]
    fn test_empty_chart_is_missing_data() {
        let response: ChartResponse =
            serde_json::from_str(r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#)
                .unwrap();
        assert!(matches!(
            snapshot_from_chart("NOPE", response),
            Err(MarketDataError::MissingData(_))
        ));
    }
}
