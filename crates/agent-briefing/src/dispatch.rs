//! Intent dispatch
//!
//! Routes a parsed [`Intent`] to the matching fetch capability and turns the
//! outcome into a display string. Every failure is rendered here; nothing
//! propagates past [`Dispatcher::dispatch`].

use crate::api::{Headline, NewsRequest, NewsSource, PriceHistorySource, WeatherSource};
use crate::config::{BriefingConfig, NewsProvider};
use crate::error::{BriefingError, Result};
use crate::format;
use crate::intent::{Intent, MissingParams};
use crate::period::Period;
use crate::symbol::SymbolResolver;
use std::sync::Arc;

/// Outcome of one dispatched request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Formatted content
    Success(String),
    /// Human-readable reason nothing could be shown
    Failure(String),
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The text to display, whichever way the request went
    pub fn message(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }
}

impl std::fmt::Display for FetchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Defaults applied while dispatching
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Country bias for the first headline request
    pub news_country: Option<String>,
    pub default_category: String,
    pub default_location: String,
    pub news_count: usize,
    /// Whether the news source filters by category; when it does not,
    /// replies carry the default category's heading
    pub category_headings: bool,
}

impl From<&BriefingConfig> for DispatchSettings {
    fn from(config: &BriefingConfig) -> Self {
        Self {
            news_country: config.news_country.clone(),
            default_category: config.default_news_category.clone(),
            default_location: config.default_location.clone(),
            news_count: config.news_count,
            category_headings: config.news_provider == NewsProvider::NewsApi,
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from(&BriefingConfig::default())
    }
}

/// Ask for headlines with the locale bias, then at most once more without it.
///
/// Only an empty first answer triggers the second request; errors are
/// returned as they are.
pub async fn fetch_with_locale_fallback(
    source: &dyn NewsSource,
    request: &NewsRequest,
) -> Result<Vec<Headline>> {
    let headlines = source.headlines(request).await?;
    if !headlines.is_empty() || request.country.is_none() {
        return Ok(headlines);
    }

    tracing::warn!(
        category = %request.category,
        country = ?request.country,
        "No headlines for locale, retrying worldwide"
    );
    let worldwide = NewsRequest {
        country: None,
        ..request.clone()
    };
    source.headlines(&worldwide).await
}

/// Dispatches intents to the fetch capabilities
pub struct Dispatcher {
    news: Arc<dyn NewsSource>,
    weather: Arc<dyn WeatherSource>,
    resolver: SymbolResolver,
    prices: Arc<dyn PriceHistorySource>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        news: Arc<dyn NewsSource>,
        weather: Arc<dyn WeatherSource>,
        resolver: SymbolResolver,
        prices: Arc<dyn PriceHistorySource>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            news,
            weather,
            resolver,
            prices,
            settings,
        }
    }

    /// Produce the display result for an intent
    pub async fn dispatch(&self, intent: &Intent) -> FetchResult {
        tracing::info!(intent = intent.label(), "Dispatching");

        match intent {
            Intent::News { category } => self.news(category.as_deref()).await.0,
            Intent::Weather { location } => self.weather(location.as_deref()).await,
            Intent::StockPrice { identifier } => self.stock_price(identifier).await,
            Intent::StockChange { identifier, period } => {
                self.stock_change(identifier, *period).await
            }
            Intent::Incomplete(MissingParams::StockChange) => {
                FetchResult::Failure(format::MISSING_STOCK_CHANGE_PARAMS.to_string())
            }
            Intent::Incomplete(MissingParams::StockIdentifier) => {
                FetchResult::Failure(format::MISSING_STOCK_IDENTIFIER.to_string())
            }
            Intent::Unknown => FetchResult::Failure(format::HELP.to_string()),
        }
    }

    /// Top headlines for a category, along with the headlines that were shown
    pub async fn news(&self, category: Option<&str>) -> (FetchResult, Vec<Headline>) {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.settings.default_category)
            .to_ascii_lowercase();

        let request = NewsRequest {
            category: category.clone(),
            country: self.settings.news_country.clone(),
            limit: self.settings.news_count,
        };

        match fetch_with_locale_fallback(self.news.as_ref(), &request).await {
            Ok(headlines) if headlines.is_empty() => {
                (FetchResult::Failure(format::NO_NEWS.to_string()), headlines)
            }
            Ok(mut headlines) => {
                headlines.truncate(self.settings.news_count);
                let heading = if self.settings.category_headings {
                    &category
                } else {
                    &self.settings.default_category
                };
                let text = format::headlines(heading, &headlines);
                (FetchResult::Success(text), headlines)
            }
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "News fetch failed");
                (FetchResult::Failure(format::fetch_failed("news", &e)), Vec::new())
            }
        }
    }

    /// Current conditions; `None` uses the default location
    pub async fn weather(&self, location: Option<&str>) -> FetchResult {
        let location = location.unwrap_or(&self.settings.default_location).trim();
        if location.is_empty() {
            return FetchResult::Failure(format::location_not_found(location));
        }

        match self.weather.current(location).await {
            Ok(report) => FetchResult::Success(format::weather(&report)),
            Err(BriefingError::NotFound(_)) => {
                FetchResult::Failure(format::location_not_found(location))
            }
            Err(e) => {
                tracing::warn!(location, error = %e, "Weather fetch failed");
                FetchResult::Failure(format::fetch_failed("weather", &e))
            }
        }
    }

    /// Latest closing price over a one-day window
    pub async fn stock_price(&self, identifier: &str) -> FetchResult {
        let symbol = self.resolver.resolve(identifier).await;

        match self.prices.closing_prices(&symbol, Period::one_day()).await {
            Ok(prices) => match prices.last() {
                Some(price) => FetchResult::Success(format::stock_price(&symbol, *price)),
                None => FetchResult::Failure(format::stock_unavailable(&symbol)),
            },
            Err(BriefingError::NotFound(_)) => {
                FetchResult::Failure(format::stock_unavailable(&symbol))
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Price fetch failed");
                FetchResult::Failure(format::fetch_failed(&format!("stock data for {symbol}"), &e))
            }
        }
    }

    /// Latest close with its move against the previous close
    pub async fn stock_quote(&self, identifier: &str) -> FetchResult {
        let symbol = self.resolver.resolve(identifier).await;

        match self.prices.closing_prices(&symbol, Period::trading_week()).await {
            Ok(prices) => match prices.as_slice() {
                [] => FetchResult::Failure(format::stock_unavailable(&symbol)),
                [last] => FetchResult::Success(format::stock_quote(&symbol, *last, None)),
                [.., previous, last] => {
                    FetchResult::Success(format::stock_quote(&symbol, *last, Some(*previous)))
                }
            },
            Err(BriefingError::NotFound(_)) => {
                FetchResult::Failure(format::stock_unavailable(&symbol))
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Quote fetch failed");
                FetchResult::Failure(format::fetch_failed(&format!("stock data for {symbol}"), &e))
            }
        }
    }

    /// Change from the first to the last close in the period
    pub async fn stock_change(&self, identifier: &str, period: Period) -> FetchResult {
        let symbol = self.resolver.resolve(identifier).await;

        let prices = match self.prices.closing_prices(&symbol, period).await {
            Ok(prices) => prices,
            Err(BriefingError::NotFound(_) | BriefingError::InsufficientData { .. }) => Vec::new(),
            Err(e) => {
                tracing::warn!(symbol = %symbol, %period, error = %e, "History fetch failed");
                return FetchResult::Failure(format::fetch_failed(
                    &format!("stock data for {symbol}"),
                    &e,
                ));
            }
        };

        match price_span(&symbol, &prices) {
            Ok((first, last)) => {
                FetchResult::Success(format::stock_change(&symbol, period, first, last))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Cannot compute change");
                FetchResult::Failure(format::not_enough_data(&symbol))
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("resolver", &self.resolver)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// First and last close of a series with at least two points
fn price_span(symbol: &str, prices: &[f64]) -> Result<(f64, f64)> {
    match prices {
        [first, .., last] => Ok((*first, *last)),
        _ => Err(BriefingError::InsufficientData {
            subject: symbol.to_string(),
            required: 2,
            available: prices.len(),
        }),
    }
}
