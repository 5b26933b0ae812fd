//! Clients for the external services the bot relies on
//!
//! Each capability is a trait so the dispatcher can be driven by any
//! implementation: the HTTP clients in this module in production, mocks in
//! tests.

pub mod article;
pub mod news_api;
pub mod rss;
pub mod scrape;
pub mod weather;
pub mod yahoo;

use crate::error::Result;
use crate::period::Period;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

pub use article::HtmlArticleReader;
pub use news_api::NewsApiClient;
pub use rss::RssFeedClient;
pub use scrape::HeadlineScraper;
pub use weather::{OpenWeatherClient, WttrClient};
pub use yahoo::YahooFinanceClient;

/// A single headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    /// Publisher name, when the source reports one
    pub source: Option<String>,
    /// Article URL, when the source reports one
    pub link: Option<String>,
}

impl Headline {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: None,
            link: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Parameters of a headline request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    /// Category such as `general`, `business` or `sports`
    pub category: String,
    /// Two-letter country code biasing results, `None` for worldwide
    pub country: Option<String>,
    /// Maximum number of headlines wanted
    pub limit: usize,
}

/// Current conditions at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub condition: String,
    /// Temperature including its unit, e.g. `31.2°C` or `+31°C`
    pub temperature: String,
    pub humidity: Option<String>,
    pub wind: Option<String>,
}

/// Source of top headlines
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn headlines(&self, request: &NewsRequest) -> Result<Vec<Headline>>;
}

/// Source of current weather.
///
/// Unknown locations must be reported as `BriefingError::NotFound` so they can
/// be told apart from transport failures.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, location: &str) -> Result<WeatherReport>;
}

/// Free-text company name to ticker lookup
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SymbolLookup: Send + Sync {
    /// Best matching ticker, or `None` when nothing matches
    async fn lookup(&self, query: &str) -> Result<Option<String>>;
}

/// Historical closing prices
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Closing prices over `period`, oldest first.
    ///
    /// Unknown symbols yield an empty series or `BriefingError::NotFound`.
    async fn closing_prices(&self, symbol: &str, period: Period) -> Result<Vec<f64>>;
}

/// Reads the opening paragraphs of an article page
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArticleReader: Send + Sync {
    async fn leading_paragraphs(&self, url: &str, count: usize) -> Result<Vec<String>>;
}

/// User agent sent to sites that reject unidentified clients
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (compatible; agent-briefing/0.1)";

/// Shared HTTP client construction
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Fail with a transport error on non-success HTTP statuses
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    service: &str,
) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(200).collect();
    Err(crate::error::BriefingError::Transport(format!(
        "{service} returned {status}: {excerpt}"
    )))
}
