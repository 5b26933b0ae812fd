//! Intent parsing for free-text queries
//!
//! Queries are classified by an ordered list of rules. Each rule pairs a
//! predicate with an extractor, and the first rule whose predicate holds
//! produces the [`Intent`]. The order is part of the behavior: a stock change
//! request is recognised before a plain stock request, and "news" wins over
//! "weather" and "stock" when several trigger words are present.

use crate::period::Period;
use regex::Regex;
use std::sync::LazyLock;

/// Trigger words and phrases, matched as substrings of the lowercased query
mod triggers {
    pub const STOCK_CHANGE: &[&str] = &[
        "stock change",
        "change in stock of",
        "change of",
        "price change",
    ];

    pub const NEWS: &str = "news";

    pub const WEATHER: &str = "weather";

    pub const STOCK: &[&str] = &["stock", "price of"];
}

/// Trigger phrase, non-greedy company, optional connector, then `<integer> <unit>`.
static STOCK_CHANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:stock change|change in stock of|change of|price change)\s+(.*?)\s+(?:in|over|around)?\s*([0-9]+)\s*(day|month|year|d|mo|y)",
    )
    .expect("stock change pattern is a valid regex")
});

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Top headlines; `None` means the general category
    News { category: Option<String> },
    /// Current conditions; `None` means the configured default location
    Weather { location: Option<String> },
    /// Latest price of a company or ticker
    StockPrice { identifier: String },
    /// Price movement over a period
    StockChange { identifier: String, period: Period },
    /// A stock request was recognised but its parameters were missing or malformed
    Incomplete(MissingParams),
    /// Nothing matched
    Unknown,
}

/// Which recognised request lacked parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingParams {
    /// "stock change ..." without a company and a valid period
    StockChange,
    /// "stock" / "price of" with nothing after it
    StockIdentifier,
}

impl Intent {
    /// Short label used in logs and history
    pub fn label(&self) -> &'static str {
        match self {
            Self::News { category: None } => "news",
            Self::News { category: Some(_) } => "news-by-category",
            Self::Weather { .. } => "weather",
            Self::StockPrice { .. } => "stock-price",
            Self::StockChange { .. } => "stock-change",
            Self::Incomplete(_) => "incomplete",
            Self::Unknown => "unknown",
        }
    }
}

/// A captured query: the trimmed text plus an ASCII-lowercased copy.
///
/// ASCII lowercasing keeps byte offsets identical, so positions found in the
/// lowered copy slice the original text and extracted values keep the user's casing.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    lowered: String,
}

impl Query {
    pub fn new(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let lowered = text.to_ascii_lowercase();
        Self { text, lowered }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn contains(&self, trigger: &str) -> bool {
        self.lowered.contains(trigger)
    }

    fn position(&self, trigger: &str) -> Option<usize> {
        self.lowered.find(trigger)
    }

    /// Earliest occurrence of any trigger, with the trigger that matched
    fn earliest<'t>(&self, triggers: &[&'t str]) -> Option<(usize, &'t str)> {
        triggers
            .iter()
            .filter_map(|t| self.position(t).map(|pos| (pos, *t)))
            .min_by_key(|(pos, _)| *pos)
    }

    /// Trimmed text following the first occurrence of `trigger`, or `None` if empty
    fn tail_after(&self, pos: usize, trigger: &str) -> Option<String> {
        let tail = self.text[pos + trigger.len()..].trim();
        (!tail.is_empty()).then(|| tail.to_string())
    }
}

/// Extract `(company_or_symbol, period)` from a stock change request.
///
/// Matching is case-insensitive and the company keeps its original casing:
/// `"stock change TCS 1 year"` yields `("TCS", 1y)`.
pub fn parse_period(text: &str) -> Option<(String, Period)> {
    let caps = STOCK_CHANGE_PATTERN.captures(text)?;
    let company = caps.get(1)?.as_str().trim();
    if company.is_empty() {
        return None;
    }

    let period = Period::from_spoken(caps.get(2)?.as_str(), caps.get(3)?.as_str()).ok()?;
    Some((company.to_string(), period))
}

/// One classification rule
struct Rule {
    name: &'static str,
    matches: fn(&Query) -> bool,
    extract: fn(&Query) -> Intent,
}

fn is_stock_change(query: &Query) -> bool {
    let Some((change_pos, _)) = query.earliest(triggers::STOCK_CHANGE) else {
        return false;
    };
    // "news" appearing earlier keeps the request a news request
    query
        .position(triggers::NEWS)
        .is_none_or(|news_pos| news_pos > change_pos)
}

fn extract_stock_change(query: &Query) -> Intent {
    match parse_period(query.text()) {
        Some((identifier, period)) => Intent::StockChange { identifier, period },
        None => Intent::Incomplete(MissingParams::StockChange),
    }
}

fn is_news(query: &Query) -> bool {
    query.contains(triggers::NEWS)
}

fn extract_news(query: &Query) -> Intent {
    let category = query
        .position(triggers::NEWS)
        .and_then(|pos| query.tail_after(pos, triggers::NEWS));
    Intent::News { category }
}

fn is_weather(query: &Query) -> bool {
    query.contains(triggers::WEATHER)
}

fn extract_weather(query: &Query) -> Intent {
    let location = query
        .position(triggers::WEATHER)
        .and_then(|pos| query.tail_after(pos, triggers::WEATHER));
    Intent::Weather { location }
}

fn is_stock(query: &Query) -> bool {
    triggers::STOCK.iter().any(|t| query.contains(t))
}

fn extract_stock(query: &Query) -> Intent {
    let identifier = query
        .earliest(triggers::STOCK)
        .and_then(|(pos, trigger)| query.tail_after(pos, trigger));
    match identifier {
        Some(identifier) => Intent::StockPrice { identifier },
        None => Intent::Incomplete(MissingParams::StockIdentifier),
    }
}

/// Ordered rule-based intent parser
pub struct IntentParser {
    rules: Vec<Rule>,
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IntentParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentParser")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl IntentParser {
    /// Create a parser with the standard rule order
    pub fn new() -> Self {
        Self {
            rules: vec![
                Rule {
                    name: "stock-change",
                    matches: is_stock_change,
                    extract: extract_stock_change,
                },
                Rule {
                    name: "news",
                    matches: is_news,
                    extract: extract_news,
                },
                Rule {
                    name: "weather",
                    matches: is_weather,
                    extract: extract_weather,
                },
                Rule {
                    name: "stock-price",
                    matches: is_stock,
                    extract: extract_stock,
                },
            ],
        }
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Classify a raw query
    pub fn parse(&self, input: &str) -> Intent {
        self.parse_query(&Query::new(input))
    }

    /// Classify an already captured query
    pub fn parse_query(&self, query: &Query) -> Intent {
        for rule in &self.rules {
            if (rule.matches)(query) {
                let intent = (rule.extract)(query);
                tracing::debug!(rule = rule.name, intent = ?intent, "Query matched rule");
                return intent;
            }
        }

        tracing::debug!(query = query.text(), "No rule matched query");
        Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Intent {
        IntentParser::new().parse(input)
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            IntentParser::new().rule_names(),
            vec!["stock-change", "news", "weather", "stock-price"]
        );
    }

    #[test]
    fn test_parse_period_examples() {
        let (company, period) = parse_period("stock change TCS 1 year").unwrap();
        assert_eq!(company, "TCS");
        assert_eq!(period.to_string(), "1y");

        let (company, period) = parse_period("price change Infosys 3 months").unwrap();
        assert_eq!(company, "Infosys");
        assert_eq!(period.to_string(), "3mo");
    }

    #[test]
    fn test_parse_period_connectors_and_short_units() {
        let (company, period) = parse_period("change in stock of tata motors over 6 mo").unwrap();
        assert_eq!(company, "tata motors");
        assert_eq!(period.to_string(), "6mo");

        let (company, period) = parse_period("change of wipro in 5 days").unwrap();
        assert_eq!(company, "wipro");
        assert_eq!(period.to_string(), "5d");

        let (company, period) = parse_period("Stock Change HDFC around 2y").unwrap();
        assert_eq!(company, "HDFC");
        assert_eq!(period.to_string(), "2y");
    }

    #[test]
    fn test_parse_period_failures() {
        assert!(parse_period("stock change TCS").is_none());
        assert!(parse_period("stock change 1 year").is_none());
        assert!(parse_period("stock change TCS 0 days").is_none());
        assert!(parse_period("stock change TCS 2 weeks").is_none());
        assert!(parse_period("what is the weather").is_none());
    }

    #[test]
    fn test_stock_change_intent() {
        assert_eq!(
            parse("  Stock change TCS 1 year "),
            Intent::StockChange {
                identifier: "TCS".to_string(),
                period: "1y".parse().unwrap(),
            }
        );
    }

    #[test]
    fn test_malformed_stock_change_is_incomplete_not_unknown() {
        assert_eq!(
            parse("stock change TCS"),
            Intent::Incomplete(MissingParams::StockChange)
        );
        assert_eq!(
            parse("price change of something soon"),
            Intent::Incomplete(MissingParams::StockChange)
        );
    }

    #[test]
    fn test_news_intent() {
        assert_eq!(parse("news"), Intent::News { category: None });
        assert_eq!(parse("Latest NEWS   "), Intent::News { category: None });
        assert_eq!(
            parse("news sports"),
            Intent::News {
                category: Some("sports".to_string())
            }
        );
    }

    #[test]
    fn test_news_wins_over_other_triggers() {
        assert!(matches!(parse("company stock news today"), Intent::News { .. }));
        assert!(matches!(parse("weather news"), Intent::News { .. }));
        assert!(matches!(parse("news about the stock price of tcs"), Intent::News { .. }));
        assert!(matches!(parse("news on price change tcs 1 year"), Intent::News { .. }));
        assert_eq!(parse("stocknews"), Intent::News { category: None });
    }

    #[test]
    fn test_stock_change_before_news_stays_stock_change() {
        assert!(matches!(
            parse("stock change tcs 1 year news"),
            Intent::StockChange { .. }
        ));
    }

    #[test]
    fn test_weather_intent() {
        assert_eq!(parse("weather"), Intent::Weather { location: None });
        assert_eq!(
            parse("weather New Delhi"),
            Intent::Weather {
                location: Some("New Delhi".to_string())
            }
        );
        assert_eq!(
            parse("what's the weather in Mumbai"),
            Intent::Weather {
                location: Some("in Mumbai".to_string())
            }
        );
    }

    #[test]
    fn test_stock_price_intent() {
        assert_eq!(
            parse("stock TCS"),
            Intent::StockPrice {
                identifier: "TCS".to_string()
            }
        );
        assert_eq!(
            parse("what is the price of Reliance Industries"),
            Intent::StockPrice {
                identifier: "Reliance Industries".to_string()
            }
        );
        // earliest trigger wins
        assert_eq!(
            parse("price of stock infy"),
            Intent::StockPrice {
                identifier: "stock infy".to_string()
            }
        );
    }

    #[test]
    fn test_empty_stock_is_incomplete() {
        assert_eq!(
            parse("stock"),
            Intent::Incomplete(MissingParams::StockIdentifier)
        );
        assert_eq!(
            parse("price of   "),
            Intent::Incomplete(MissingParams::StockIdentifier)
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(parse(""), Intent::Unknown);
        assert_eq!(parse("hello there"), Intent::Unknown);
        assert_eq!(parse(&"x".repeat(10_000)), Intent::Unknown);
    }

    #[test]
    fn test_non_ascii_input_keeps_offsets() {
        assert_eq!(
            parse("Weather São Paulo"),
            Intent::Weather {
                location: Some("São Paulo".to_string())
            }
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(parse("news").label(), "news");
        assert_eq!(parse("news tech").label(), "news-by-category");
        assert_eq!(parse("hi").label(), "unknown");
    }
}
