//! Yahoo Finance client: ticker search and closing price history

use super::{PriceHistorySource, SymbolLookup};
use crate::error::{BriefingError, Result};
use crate::period::Period;
use crate::symbol::Exchange;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Result<Self> {
        Ok(Self {
            connector: yahoo::YahooConnector::new()?,
        })
    }

    async fn quotes_for_range(&self, symbol: &str, range: &str) -> Result<Vec<yahoo::Quote>> {
        let response = self.connector.get_quote_range(symbol, "1d", range).await?;
        Ok(quotes_or_empty(symbol, response.quotes()))
    }

    async fn quotes_between(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<yahoo::Quote>> {
        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| BriefingError::Parse(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| BriefingError::Parse(format!("Invalid end timestamp: {e}")))?;

        let response = self
            .connector
            .get_quote_history(symbol, start_odt, end_odt)
            .await?;
        Ok(quotes_or_empty(symbol, response.quotes()))
    }
}

/// Yahoo reports an empty chart as an error; callers want an empty series
fn quotes_or_empty(
    symbol: &str,
    quotes: std::result::Result<Vec<yahoo::Quote>, yahoo::YahooError>,
) -> Vec<yahoo::Quote> {
    quotes.unwrap_or_else(|e| {
        tracing::debug!(symbol, error = %e, "No quotes in Yahoo response");
        Vec::new()
    })
}

/// Start of a look-back window ending at `end`
fn window_start(period: Period, end: DateTime<Utc>) -> DateTime<Utc> {
    end - chrono::Duration::days(period.approx_days())
}

#[async_trait]
impl PriceHistorySource for YahooFinanceClient {
    async fn closing_prices(&self, symbol: &str, period: Period) -> Result<Vec<f64>> {
        tracing::debug!(symbol, %period, "Fetching price history");

        let quotes = match period.as_yahoo_range() {
            Some(range) => self.quotes_for_range(symbol, range).await?,
            None => {
                let end = Utc::now();
                self.quotes_between(symbol, window_start(period, end), end)
                    .await?
            }
        };

        Ok(quotes.iter().map(|q| q.close).collect())
    }
}

#[async_trait]
impl SymbolLookup for YahooFinanceClient {
    async fn lookup(&self, query: &str) -> Result<Option<String>> {
        let result = self.connector.search_ticker(query).await?;
        let symbols: Vec<String> = result.quotes.into_iter().map(|q| q.symbol).collect();
        Ok(pick_symbol(symbols))
    }
}

/// Prefer the first Indian listing; otherwise take the first match
fn pick_symbol(symbols: Vec<String>) -> Option<String> {
    symbols
        .iter()
        .find(|s| Exchange::of_symbol(s).is_some())
        .cloned()
        .or_else(|| symbols.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_symbol_prefers_indian_listing() {
        let picked = pick_symbol(vec![
            "TTM".to_string(),
            "TATAMOTORS.NS".to_string(),
            "TATAMOTORS.BO".to_string(),
        ]);
        assert_eq!(picked.as_deref(), Some("TATAMOTORS.NS"));

        assert_eq!(pick_symbol(vec!["AAPL".to_string()]).as_deref(), Some("AAPL"));
        assert_eq!(pick_symbol(Vec::new()), None);
    }

    #[test]
    fn test_window_start() {
        let end = Utc::now();
        let start = window_start("7d".parse().unwrap(), end);
        assert_eq!((end - start).num_days(), 7);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_closing_prices() {
        let client = YahooFinanceClient::new().unwrap();
        let prices = client
            .closing_prices("TCS.NS", "1mo".parse().unwrap())
            .await
            .unwrap();
        assert!(prices.len() > 1);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_lookup() {
        let client = YahooFinanceClient::new().unwrap();
        let symbol = client.lookup("infosys").await.unwrap();
        assert!(symbol.is_some());
    }
}
