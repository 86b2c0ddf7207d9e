//! Yahoo Finance market data agent

use crate::error::{AgentError, Result};
use crate::roles::MarketData;
use crate::snapshot::MarketSnapshot;
use async_trait::async_trait;
use brief_core::Citation;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

/// Fetches point-in-time market snapshots from Yahoo Finance
pub struct YahooMarketAgent {}

impl YahooMarketAgent {
    pub fn new() -> Self {
        Self {}
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| AgentError::YahooFinance(e.to_string()))
    }

    /// 52-week high/low from one year of daily quotes
    ///
    /// Treated as optional: a history failure degrades the snapshot, it
    /// does not fail the fetch.
    async fn week_52_range(provider: &yahoo::YahooConnector, ticker: &str) -> Option<(f64, f64)> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(365);

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp()).ok()?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp()).ok()?;

        let response = match provider.get_quote_history(ticker, start_odt, end_odt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(ticker, "Quote history unavailable: {e}");
                return None;
            }
        };
        let quotes = response.quotes().ok()?;
        if quotes.is_empty() {
            return None;
        }

        let high = quotes.iter().map(|q| q.high).fold(f64::MIN, f64::max);
        let low = quotes.iter().map(|q| q.low).fold(f64::MAX, f64::min);
        Some((low, high))
    }
}

impl Default for YahooMarketAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketData for YahooMarketAgent {
    async fn fetch(&self, ticker: &str) -> Result<MarketSnapshot> {
        let provider = Self::connector()?;

        let response = provider
            .get_latest_quotes(ticker, "1d")
            .await
            .map_err(|e| AgentError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            })?;
        let quote = response
            .last_quote()
            .map_err(|e| AgentError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            })?;

        let timestamp =
            DateTime::from_timestamp(quote.timestamp as i64, 0).unwrap_or_else(Utc::now);
        let citation = Citation::market_data(
            ticker,
            format!("https://finance.yahoo.com/quote/{ticker}"),
            timestamp.to_rfc3339(),
        );

        let mut snapshot = MarketSnapshot::empty(ticker, citation);
        snapshot.timestamp = timestamp;
        snapshot.current_price = Some(quote.close);
        snapshot.open = Some(quote.open);
        snapshot.previous_close = Some(quote.adjclose);
        snapshot.volume = Some(quote.volume);

        // Fundamentals (market cap, P/E, beta, yield, shares) are not
        // exposed by the chart endpoint this client wraps; those fields
        // stay None and render as N/A downstream.
        if let Some((low, high)) = Self::week_52_range(&provider, ticker).await {
            snapshot.week_52_low = Some(low);
            snapshot.week_52_high = Some(high);
        }

        debug!(ticker, price = quote.close, "Fetched market snapshot");
        Ok(snapshot)
    }
}
