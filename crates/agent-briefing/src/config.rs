//! Configuration for the briefing bot

use crate::api::rss::DEFAULT_FEED_URL;
use crate::error::{BriefingError, Result};
use crate::symbol::Exchange;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Upper bound on headlines per reply
pub const MAX_NEWS_COUNT: usize = 50;

/// Where headlines come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NewsProvider {
    /// NewsAPI.org top headlines (requires API key, supports categories)
    #[default]
    NewsApi,
    /// An RSS feed (no key, no categories)
    Rss,
    /// Headlines scraped from the Times of India pages (no key, no categories)
    Scrape,
}

impl FromStr for NewsProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newsapi" | "news-api" => Ok(Self::NewsApi),
            "rss" | "feed" => Ok(Self::Rss),
            "scrape" | "toi" | "timesofindia" => Ok(Self::Scrape),
            other => Err(format!("unknown news provider: {other}")),
        }
    }
}

/// Where weather comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeatherProvider {
    /// OpenWeatherMap (requires API key)
    #[default]
    OpenWeather,
    /// wttr.in (no key)
    Wttr,
}

impl FromStr for WeatherProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openweather" | "openweathermap" | "owm" => Ok(Self::OpenWeather),
            "wttr" | "wttr.in" => Ok(Self::Wttr),
            other => Err(format!("unknown weather provider: {other}")),
        }
    }
}

/// Configuration for the briefing bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingConfig {
    /// Headline provider
    pub news_provider: NewsProvider,

    /// Weather provider
    pub weather_provider: WeatherProvider,

    /// NewsAPI key (optional)
    pub news_api_key: Option<String>,

    /// OpenWeatherMap key (optional)
    pub weather_api_key: Option<String>,

    /// Country bias for the first headline request; `None` disables the bias
    pub news_country: Option<String>,

    /// Category used when the query names none
    pub default_news_category: String,

    /// Location used when a weather query names none
    pub default_location: String,

    /// Exchange suffix appended to unqualified symbols
    pub default_exchange: Exchange,

    /// Headlines per reply
    pub news_count: usize,

    /// Feed read by the RSS provider
    pub rss_feed_url: String,

    /// Request timeout duration
    pub request_timeout: Duration,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            news_provider: NewsProvider::NewsApi,
            weather_provider: WeatherProvider::OpenWeather,
            news_api_key: None,
            weather_api_key: None,
            news_country: Some("in".to_string()),
            default_news_category: "general".to_string(),
            default_location: "Delhi".to_string(),
            default_exchange: Exchange::Nse,
            news_count: 5,
            rss_feed_url: DEFAULT_FEED_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl BriefingConfig {
    /// Create a new configuration builder
    pub fn builder() -> BriefingConfigBuilder {
        BriefingConfigBuilder::default()
    }

    /// Build a configuration from a `.env` file and the process environment
    pub fn from_env() -> Result<Self> {
        agent_utils::load_dotenv();
        Self::builder().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.news_count == 0 || self.news_count > MAX_NEWS_COUNT {
            return Err(BriefingError::Config(format!(
                "news_count must be between 1 and {MAX_NEWS_COUNT}, got {}",
                self.news_count
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(BriefingError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.default_location.trim().is_empty() {
            return Err(BriefingError::Config(
                "default_location must not be empty".to_string(),
            ));
        }

        if self.news_provider == NewsProvider::NewsApi && self.news_api_key.is_none() {
            tracing::warn!("NEWS_API_KEY is not set; news requests will fail");
        }
        if self.weather_provider == WeatherProvider::OpenWeather && self.weather_api_key.is_none() {
            tracing::warn!("WEATHER_API_KEY is not set; weather requests will fail");
        }

        Ok(())
    }
}

/// Builder for BriefingConfig
#[derive(Debug, Default)]
pub struct BriefingConfigBuilder {
    news_provider: Option<NewsProvider>,
    weather_provider: Option<WeatherProvider>,
    news_api_key: Option<String>,
    weather_api_key: Option<String>,
    news_country: Option<Option<String>>,
    default_news_category: Option<String>,
    default_location: Option<String>,
    default_exchange: Option<Exchange>,
    news_count: Option<usize>,
    rss_feed_url: Option<String>,
    request_timeout: Option<Duration>,
}

impl BriefingConfigBuilder {
    /// Set the headline provider
    pub fn news_provider(mut self, provider: NewsProvider) -> Self {
        self.news_provider = Some(provider);
        self
    }

    /// Set the weather provider
    pub fn weather_provider(mut self, provider: WeatherProvider) -> Self {
        self.weather_provider = Some(provider);
        self
    }

    /// Set NewsAPI key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Set OpenWeatherMap key
    pub fn weather_api_key(mut self, key: impl Into<String>) -> Self {
        self.weather_api_key = Some(key.into());
        self
    }

    /// Set the country bias; `None` asks for worldwide headlines straight away
    pub fn news_country(mut self, country: Option<String>) -> Self {
        self.news_country = Some(country);
        self
    }

    /// Set the default news category
    pub fn default_news_category(mut self, category: impl Into<String>) -> Self {
        self.default_news_category = Some(category.into());
        self
    }

    /// Set the default weather location
    pub fn default_location(mut self, location: impl Into<String>) -> Self {
        self.default_location = Some(location.into());
        self
    }

    /// Set the default exchange
    pub fn default_exchange(mut self, exchange: Exchange) -> Self {
        self.default_exchange = Some(exchange);
        self
    }

    /// Set headlines per reply
    pub fn news_count(mut self, count: usize) -> Self {
        self.news_count = Some(count);
        self
    }

    /// Set the RSS feed URL
    pub fn rss_feed_url(mut self, url: impl Into<String>) -> Self {
        self.rss_feed_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Fill unset fields from environment variables
    pub fn with_env(mut self) -> Self {
        use agent_utils::{env_parse, env_var};

        if self.news_api_key.is_none() {
            self.news_api_key = env_var("NEWS_API_KEY");
        }
        if self.weather_api_key.is_none() {
            self.weather_api_key = env_var("WEATHER_API_KEY");
        }
        if self.news_provider.is_none() {
            self.news_provider = env_parse("BRIEFING_NEWS_PROVIDER");
        }
        if self.weather_provider.is_none() {
            self.weather_provider = env_parse("BRIEFING_WEATHER_PROVIDER");
        }
        if self.news_country.is_none() {
            // "none" or "world" turns the bias off
            self.news_country = env_var("BRIEFING_NEWS_COUNTRY").map(|c| {
                match c.to_ascii_lowercase().as_str() {
                    "none" | "world" => None,
                    _ => Some(c.to_ascii_lowercase()),
                }
            });
        }
        if self.default_location.is_none() {
            self.default_location = env_var("BRIEFING_DEFAULT_LOCATION");
        }
        if self.default_exchange.is_none() {
            self.default_exchange = env_parse("BRIEFING_DEFAULT_EXCHANGE");
        }
        if self.news_count.is_none() {
            self.news_count = env_parse("BRIEFING_NEWS_COUNT");
        }
        if self.rss_feed_url.is_none() {
            self.rss_feed_url = env_var("BRIEFING_RSS_FEED_URL");
        }
        if self.request_timeout.is_none() {
            self.request_timeout =
                env_parse::<u64>("BRIEFING_REQUEST_TIMEOUT_SECS").map(Duration::from_secs);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BriefingConfig> {
        let defaults = BriefingConfig::default();

        let config = BriefingConfig {
            news_provider: self.news_provider.unwrap_or(defaults.news_provider),
            weather_provider: self.weather_provider.unwrap_or(defaults.weather_provider),
            news_api_key: self.news_api_key,
            weather_api_key: self.weather_api_key,
            news_country: self.news_country.unwrap_or(defaults.news_country),
            default_news_category: self
                .default_news_category
                .unwrap_or(defaults.default_news_category),
            default_location: self.default_location.unwrap_or(defaults.default_location),
            default_exchange: self.default_exchange.unwrap_or(defaults.default_exchange),
            news_count: self.news_count.unwrap_or(defaults.news_count),
            rss_feed_url: self.rss_feed_url.unwrap_or(defaults.rss_feed_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}
