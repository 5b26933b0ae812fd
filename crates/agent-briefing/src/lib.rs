//! Conversational news, weather and stock price briefings
//!
//! Free-text queries are classified into an [`Intent`] by an ordered list of
//! rules, dispatched to the matching external service, and rendered as a
//! single display string. The pieces:
//!
//! - [`intent`]: ordered rule-based classification and period parsing
//! - [`symbol`]: ticker / company name resolution to `.NS` / `.BO` symbols
//! - [`dispatch`]: intent routing, the news locale fallback, error rendering
//! - [`api`]: NewsAPI, RSS, scraped headline pages, OpenWeatherMap, wttr.in,
//!   Yahoo Finance and article page clients behind capability traits
//! - [`bot`]: session commands, history and headline insights
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_briefing::{BriefingConfig, IntentParser};
//! use agent_briefing::bot::{BotConfig, BriefingBot};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let intent = IntentParser::new().parse("stock change TCS 1 year");
//!     println!("{}", intent.label());
//!
//!     let config = BotConfig::builder()
//!         .briefing(BriefingConfig::from_env()?)
//!         .build();
//!     let bot = BriefingBot::new(config)?;
//!     println!("{}", bot.dispatcher().dispatch(&intent).await);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod intent;
pub mod period;
pub mod symbol;

// Re-export main types for convenience
pub use config::{BriefingConfig, NewsProvider, WeatherProvider};
pub use dispatch::{DispatchSettings, Dispatcher, FetchResult, fetch_with_locale_fallback};
pub use error::{BriefingError, Result};
pub use intent::{Intent, IntentParser, MissingParams, Query, parse_period};
pub use period::{Period, PeriodUnit};
pub use symbol::{Exchange, SymbolResolver};
