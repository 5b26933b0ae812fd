//! Error types for briefing operations

use thiserror::Error;

/// Errors raised by fetchers, the parser and configuration
#[derive(Debug, Error)]
pub enum BriefingError {
    /// Network failure, timeout or non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Location, symbol or company could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// Too few data points to compute a result
    #[error("Insufficient data for {subject}: need {required}, got {available}")]
    InsufficientData {
        subject: String,
        required: usize,
        available: usize,
    },

    /// Input or upstream payload did not match the expected grammar
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or invalid configuration, such as an absent API key
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BriefingError {
    /// Whether the failure came from talking to a dependency.
    ///
    /// Configuration failures count as dependency failures: a fetcher that
    /// cannot run because its credential is missing is reported the same way
    /// as one whose request failed.
    pub fn is_dependency_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Config(_) | Self::Parse(_))
    }

    /// The underlying message without the variant prefix
    pub fn reason(&self) -> String {
        match self {
            Self::Transport(reason)
            | Self::NotFound(reason)
            | Self::Parse(reason)
            | Self::Config(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for BriefingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BriefingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<url::ParseError> for BriefingError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {err}"))
    }
}

impl From<yahoo_finance_api::YahooError> for BriefingError {
    /// Chart errors and empty results mean Yahoo has no such symbol
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        use yahoo_finance_api::YahooError;

        match err {
            YahooError::ApiError(_) | YahooError::NoResult | YahooError::NoQuotes => {
                Self::NotFound(format!("Yahoo Finance: {err}"))
            }
            other => Self::Transport(format!("Yahoo Finance: {other}")),
        }
    }
}

/// Result type alias for briefing operations
pub type Result<T> = std::result::Result<T, BriefingError>;
