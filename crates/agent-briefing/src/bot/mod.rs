//! Briefing Bot
//!
//! A conversational front-end over the intent parser and dispatcher.
//!
//! # Features
//!
//! - **Free-text queries**: "news sports", "weather Pune", "stock TCS",
//!   "stock change Infosys 3 months"
//! - **Headline insights**: `/read 2` shows the opening paragraphs of the
//!   second headline from the last news reply
//! - **Session history**: `/history` lists every query of the session
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_briefing::bot::{BotConfig, BotReply, BriefingBot};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut bot = BriefingBot::new(BotConfig::from_env()?)?;
//!     if let BotReply::Message(text) = bot.process_input("news business").await? {
//!         println!("{text}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod conversation;

use crate::api::{
    ArticleReader, Headline, HeadlineScraper, HtmlArticleReader, NewsApiClient, NewsSource,
    OpenWeatherClient, PriceHistorySource, RssFeedClient, SymbolLookup, WeatherSource,
    WttrClient, YahooFinanceClient,
};
use crate::config::{BriefingConfig, NewsProvider, WeatherProvider};
use crate::dispatch::{DispatchSettings, Dispatcher};
use crate::error::Result;
use crate::format;
use crate::intent::{Intent, IntentParser};
use crate::symbol::SymbolResolver;
use std::sync::Arc;
use uuid::Uuid;

pub use commands::Command;
pub use conversation::{ConversationManager, ConversationTurn};

/// Configuration for the briefing bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Fetcher and dispatch configuration
    pub briefing: BriefingConfig,
    /// Welcome message
    pub welcome_message: String,
    /// Prompt prefix
    pub prompt: String,
    /// Paragraphs shown by `/read`
    pub insight_paragraphs: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            briefing: BriefingConfig::default(),
            welcome_message: "Briefing Bot - type /help for usage".to_string(),
            prompt: ">>> ".to_string(),
            insight_paragraphs: 3,
        }
    }
}

impl BotConfig {
    /// Create config from a `.env` file and environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            briefing: BriefingConfig::from_env()?,
            ..Default::default()
        })
    }

    /// Create a builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    briefing: Option<BriefingConfig>,
    welcome_message: Option<String>,
    prompt: Option<String>,
    insight_paragraphs: Option<usize>,
}

impl BotConfigBuilder {
    /// Set briefing config
    pub fn briefing(mut self, config: BriefingConfig) -> Self {
        self.briefing = Some(config);
        self
    }

    /// Set welcome message
    pub fn welcome_message(mut self, msg: impl Into<String>) -> Self {
        self.welcome_message = Some(msg.into());
        self
    }

    /// Set prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set paragraphs shown by `/read`
    pub fn insight_paragraphs(mut self, count: usize) -> Self {
        self.insight_paragraphs = Some(count);
        self
    }

    /// Build the config
    pub fn build(self) -> BotConfig {
        let defaults = BotConfig::default();
        BotConfig {
            briefing: self.briefing.unwrap_or(defaults.briefing),
            welcome_message: self.welcome_message.unwrap_or(defaults.welcome_message),
            prompt: self.prompt.unwrap_or(defaults.prompt),
            insight_paragraphs: self.insight_paragraphs.unwrap_or(defaults.insight_paragraphs),
        }
    }
}

/// The capabilities a bot is wired to
#[derive(Clone)]
pub struct Sources {
    pub news: Arc<dyn NewsSource>,
    pub weather: Arc<dyn WeatherSource>,
    pub lookup: Arc<dyn SymbolLookup>,
    pub prices: Arc<dyn PriceHistorySource>,
    pub articles: Arc<dyn ArticleReader>,
}

impl Sources {
    /// HTTP clients selected by the configured providers
    pub fn from_config(config: &BriefingConfig) -> Result<Self> {
        let timeout = config.request_timeout;

        let news: Arc<dyn NewsSource> = match config.news_provider {
            NewsProvider::NewsApi => {
                Arc::new(NewsApiClient::new(config.news_api_key.clone(), timeout)?)
            }
            NewsProvider::Rss => {
                Arc::new(RssFeedClient::new(config.rss_feed_url.clone(), timeout)?)
            }
            NewsProvider::Scrape => Arc::new(HeadlineScraper::new(timeout)?),
        };

        let weather: Arc<dyn WeatherSource> = match config.weather_provider {
            WeatherProvider::OpenWeather => {
                Arc::new(OpenWeatherClient::new(config.weather_api_key.clone(), timeout)?)
            }
            WeatherProvider::Wttr => Arc::new(WttrClient::new(timeout)?),
        };

        let yahoo = Arc::new(YahooFinanceClient::new()?);

        Ok(Self {
            news,
            weather,
            lookup: yahoo.clone(),
            prices: yahoo,
            articles: Arc::new(HtmlArticleReader::new(timeout)?),
        })
    }
}

/// Reply to one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotReply {
    /// Text to show the user
    Message(String),
    /// The user asked to leave
    Exit,
}

/// Briefing Bot
pub struct BriefingBot {
    session_id: Uuid,
    parser: IntentParser,
    dispatcher: Dispatcher,
    articles: Arc<dyn ArticleReader>,
    conversation: ConversationManager,
    /// Headlines from the most recent successful news reply, for `/read`
    last_headlines: Vec<Headline>,
    config: BotConfig,
}

impl BriefingBot {
    /// Create a bot backed by the HTTP clients the configuration selects
    pub fn new(config: BotConfig) -> Result<Self> {
        let sources = Sources::from_config(&config.briefing)?;
        Ok(Self::with_sources(config, sources))
    }

    /// Create a bot over the given capabilities
    pub fn with_sources(config: BotConfig, sources: Sources) -> Self {
        let resolver = SymbolResolver::new(sources.lookup, config.briefing.default_exchange);
        let dispatcher = Dispatcher::new(
            sources.news,
            sources.weather,
            resolver,
            sources.prices,
            DispatchSettings::from(&config.briefing),
        );

        let session_id = Uuid::new_v4();
        tracing::info!(%session_id, "Briefing session started");

        Self {
            session_id,
            parser: IntentParser::new(),
            dispatcher,
            articles: sources.articles,
            conversation: ConversationManager::new(),
            last_headlines: Vec::new(),
            config,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Get the welcome message
    pub fn welcome(&self) -> &str {
        &self.config.welcome_message
    }

    /// Get the prompt
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    /// The dispatcher, for callers that bypass the parser
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Process user input and return a reply
    pub async fn process_input(&mut self, input: &str) -> Result<BotReply> {
        let command = Command::parse(input)?;
        Ok(self.execute_command(command).await)
    }

    /// Execute a parsed command
    pub async fn execute_command(&mut self, command: Command) -> BotReply {
        match command {
            Command::Help => BotReply::Message(Command::help_text().to_string()),
            Command::History => BotReply::Message(self.conversation.format_history()),
            Command::Exit => BotReply::Exit,
            Command::Read { index } => BotReply::Message(self.read_headline(index).await),
            Command::Query { text } => BotReply::Message(self.answer(text).await),
        }
    }

    /// Classify and answer a free-text query, recording it in the history
    pub async fn answer(&mut self, text: String) -> String {
        let intent = self.parser.parse(&text);

        let result = match &intent {
            Intent::News { category } => {
                let (result, headlines) = self.dispatcher.news(category.as_deref()).await;
                if !headlines.is_empty() {
                    self.last_headlines = headlines;
                }
                result
            }
            other => self.dispatcher.dispatch(other).await,
        };

        let reply = result.into_message();
        self.conversation.add_turn(text, intent.label(), reply.clone());
        reply
    }

    async fn read_headline(&self, index: usize) -> String {
        if self.last_headlines.is_empty() {
            return "No headlines to read yet. Ask for news first.".to_string();
        }

        let Some(headline) = index
            .checked_sub(1)
            .and_then(|i| self.last_headlines.get(i))
        else {
            return format!(
                "There is no headline {index}; the last reply listed {}.",
                self.last_headlines.len()
            );
        };

        let Some(link) = &headline.link else {
            return format::NO_INSIGHTS.to_string();
        };

        match self
            .articles
            .leading_paragraphs(link, self.config.insight_paragraphs)
            .await
        {
            Ok(paragraphs) => format::insights(&headline.title, &paragraphs),
            Err(e) => {
                tracing::warn!(url = %link, error = %e, "Article fetch failed");
                format::fetch_failed("the article", &e)
            }
        }
    }

    /// Get the conversation manager
    pub fn conversation(&self) -> &ConversationManager {
        &self.conversation
    }

    /// Headlines `/read` currently refers to
    pub fn last_headlines(&self) -> &[Headline] {
        &self.last_headlines
    }
}

impl std::fmt::Debug for BriefingBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BriefingBot")
            .field("session_id", &self.session_id)
            .field("dispatcher", &self.dispatcher)
            .field("turns", &self.conversation.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        MockArticleReader, MockNewsSource, MockPriceHistorySource, MockSymbolLookup,
        MockWeatherSource,
    };
    use crate::error::BriefingError;

    fn bot(news: MockNewsSource, articles: MockArticleReader) -> BriefingBot {
        BriefingBot::with_sources(
            BotConfig::default(),
            Sources {
                news: Arc::new(news),
                weather: Arc::new(MockWeatherSource::new()),
                lookup: Arc::new(MockSymbolLookup::new()),
                prices: Arc::new(MockPriceHistorySource::new()),
                articles: Arc::new(articles),
            },
        )
    }

    fn two_headlines() -> MockNewsSource {
        let mut news = MockNewsSource::new();
        news.expect_headlines().returning(|_| {
            Ok(vec![
                Headline::new("Budget session opens").with_link("https://example.com/budget"),
                Headline::new("No link here").with_source("Agency"),
            ])
        });
        news
    }

    #[test]
    fn test_bot_config_default() {
        let config = BotConfig::default();
        assert!(!config.welcome_message.is_empty());
        assert_eq!(config.prompt, ">>> ");
        assert_eq!(config.insight_paragraphs, 3);
    }

    #[test]
    fn test_bot_config_builder() {
        let config = BotConfig::builder()
            .prompt("$ ")
            .insight_paragraphs(1)
            .build();

        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.insight_paragraphs, 1);
    }

    #[tokio::test]
    async fn test_read_uses_last_headlines() {
        let mut articles = MockArticleReader::new();
        articles
            .expect_leading_paragraphs()
            .withf(|url, count| url.to_string() == "https://example.com/budget" && *count == 3)
            .times(1)
            .returning(|_, _| Ok(vec!["The session opened on Monday.".to_string()]));

        let mut bot = bot(two_headlines(), articles);
        bot.process_input("news").await.unwrap();
        assert_eq!(bot.last_headlines().len(), 2);

        let reply = bot.process_input("/read 1").await.unwrap();
        assert_eq!(
            reply,
            BotReply::Message("Budget session opens\n\nThe session opened on Monday.".to_string())
        );
    }

    #[tokio::test]
    async fn test_read_without_link_or_news() {
        let mut articles = MockArticleReader::new();
        articles.expect_leading_paragraphs().never();
        let mut bot = bot(two_headlines(), articles);

        let reply = bot.process_input("/read 1").await.unwrap();
        assert_eq!(
            reply,
            BotReply::Message("No headlines to read yet. Ask for news first.".to_string())
        );

        bot.process_input("news").await.unwrap();
        let reply = bot.process_input("/read 2").await.unwrap();
        assert_eq!(reply, BotReply::Message(format::NO_INSIGHTS.to_string()));

        let reply = bot.process_input("/read 9").await.unwrap();
        assert_eq!(
            reply,
            BotReply::Message("There is no headline 9; the last reply listed 2.".to_string())
        );
    }

    #[tokio::test]
    async fn test_read_fetch_failure() {
        let mut articles = MockArticleReader::new();
        articles
            .expect_leading_paragraphs()
            .returning(|_, _| Err(BriefingError::Transport("403 Forbidden".to_string())));
        let mut bot = bot(two_headlines(), articles);

        bot.process_input("news").await.unwrap();
        let reply = bot.process_input("/read 1").await.unwrap();
        assert_eq!(
            reply,
            BotReply::Message("Could not fetch the article right now: 403 Forbidden".to_string())
        );
    }

    #[tokio::test]
    async fn test_history_records_queries_only() {
        let mut bot = bot(two_headlines(), MockArticleReader::new());

        bot.process_input("news").await.unwrap();
        bot.process_input("hello there").await.unwrap();
        bot.process_input("/help").await.unwrap();

        let turns = bot.conversation().history();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].intent, "news");
        assert_eq!(turns[1].intent, "unknown");
        assert_eq!(turns[1].response, format::HELP);
    }

    #[tokio::test]
    async fn test_exit_and_bad_commands() {
        let mut bot = bot(MockNewsSource::new(), MockArticleReader::new());
        assert_eq!(bot.process_input("/exit").await.unwrap(), BotReply::Exit);
        assert!(bot.process_input("/bogus").await.is_err());
    }
}
