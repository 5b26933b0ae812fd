//! Rendering of fetch results into display strings

use crate::api::{Headline, WeatherReport};
use crate::error::BriefingError;
use crate::period::Period;
use std::fmt::Write;

/// Reply to queries no rule recognised.
///
/// Must never contain a trigger word, or feeding the reply back in would
/// produce an intent.
pub const HELP: &str = "Sorry, I didn't catch that. I can look up: top headlines by category, \
current conditions for a city, the latest share quote for a company or ticker, and how a share \
quote moved over a period such as 1 day, 3 months or 1 year.";

pub const NO_NEWS: &str = "No news available at the moment. Try again later.";

pub const NO_INSIGHTS: &str = "No insights available.";

pub const MISSING_STOCK_CHANGE_PARAMS: &str =
    "Please specify a valid company name and time period (e.g., 'stock change TCS 1 year').";

pub const MISSING_STOCK_IDENTIFIER: &str = "Please specify a company name or stock symbol.";

/// Numbered headline list under a category heading
pub fn headlines(category: &str, headlines: &[Headline]) -> String {
    if headlines.is_empty() {
        return NO_NEWS.to_string();
    }

    let mut out = format!("Latest {} News:", title_case(category));
    for (i, headline) in headlines.iter().enumerate() {
        let _ = write!(out, "\n{}. {}", i + 1, headline.title);
        if let Some(source) = &headline.source {
            let _ = write!(out, " - {source}");
        }
        if let Some(link) = &headline.link {
            let _ = write!(out, "\n   Link: {link}");
        }
    }
    out
}

pub fn weather(report: &WeatherReport) -> String {
    let mut out = format!(
        "Weather in {}: {}, {}",
        report.location, report.condition, report.temperature
    );
    if let Some(humidity) = &report.humidity {
        let _ = write!(out, ", humidity {humidity}");
    }
    if let Some(wind) = &report.wind {
        let _ = write!(out, ", wind {wind}");
    }
    out
}

pub fn location_not_found(location: &str) -> String {
    format!("Location '{location}' not found. Try entering a major city, district, or state.")
}

pub fn stock_price(symbol: &str, price: f64) -> String {
    format!("Latest stock price of {symbol}: ₹{price:.2}")
}

/// Latest close, followed by the 1-day move when a previous close is known
pub fn stock_quote(symbol: &str, last: f64, previous: Option<f64>) -> String {
    let mut out = stock_price(symbol, last);
    if let Some(previous) = previous {
        let change = last - previous;
        let percent = if previous == 0.0 { 0.0 } else { change / previous * 100.0 };
        let arrow = if change > 0.0 {
            '↑'
        } else if change < 0.0 {
            '↓'
        } else {
            '→'
        };
        let _ = write!(
            out,
            "\n1-day change: {arrow} ₹{:.2} ({arrow} {:.2}%)",
            change.abs(),
            percent.abs()
        );
    }
    out
}

pub fn stock_unavailable(symbol: &str) -> String {
    format!("Stock data not available for {symbol}. Please check the company name or symbol.")
}

pub fn stock_change(symbol: &str, period: Period, first: f64, last: f64) -> String {
    let change = last - first;
    let percent = if first == 0.0 { 0.0 } else { change / first * 100.0 };
    format!("Stock price change for {symbol} over {period}: ₹{change:.2} ({percent:.2}%)")
}

pub fn not_enough_data(symbol: &str) -> String {
    format!("Not enough data to calculate stock price change for {symbol}.")
}

/// Leading paragraphs of an article, or a placeholder when there are none
pub fn insights(title: &str, paragraphs: &[String]) -> String {
    if paragraphs.is_empty() {
        return NO_INSIGHTS.to_string();
    }
    format!("{title}\n\n{}", paragraphs.join("\n\n"))
}

/// A failed fetch, worded apart from "not found" replies.
///
/// Only dependency failures are presented as worth retrying later.
pub fn fetch_failed(what: &str, err: &BriefingError) -> String {
    if err.is_dependency_failure() {
        format!("Could not fetch {what} right now: {}", err.reason())
    } else {
        format!("Could not fetch {what}: {}", err.reason())
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{Intent, IntentParser};

    #[test]
    fn test_help_is_not_a_query() {
        assert_eq!(IntentParser::new().parse(HELP), Intent::Unknown);
    }

    #[test]
    fn test_headlines() {
        let list = vec![
            Headline::new("Monsoon arrives early").with_source("The Hindu"),
            Headline::new("Rates held").with_link("https://example.com/rates"),
        ];
        assert_eq!(
            headlines("business", &list),
            "Latest Business News:\n1. Monsoon arrives early - The Hindu\n2. Rates held\n   Link: https://example.com/rates"
        );
        assert_eq!(headlines("general", &[]), NO_NEWS);
    }

    #[test]
    fn test_weather() {
        let report = WeatherReport {
            location: "Delhi".to_string(),
            condition: "haze".to_string(),
            temperature: "31.5°C".to_string(),
            humidity: Some("48%".to_string()),
            wind: None,
        };
        assert_eq!(weather(&report), "Weather in Delhi: haze, 31.5°C, humidity 48%");
    }

    #[test]
    fn test_stock_change() {
        let period: Period = "1y".parse().unwrap();
        assert_eq!(
            stock_change("TCS.NS", period, 100.0, 110.0),
            "Stock price change for TCS.NS over 1y: ₹10.00 (10.00%)"
        );
        assert_eq!(
            stock_change("TCS.NS", period, 200.0, 150.0),
            "Stock price change for TCS.NS over 1y: ₹-50.00 (-25.00%)"
        );
    }

    #[test]
    fn test_fetch_failed_differs_from_not_found() {
        let failed = fetch_failed(
            "weather",
            &BriefingError::Transport("connection refused".to_string()),
        );
        assert_eq!(failed, "Could not fetch weather right now: connection refused");
        assert_ne!(failed, location_not_found("Delhi"));

        let missing_key = BriefingError::Config("NEWS_API_KEY is not set".into());
        let missing_key = fetch_failed("news", &missing_key);
        assert_eq!(missing_key, "Could not fetch news right now: NEWS_API_KEY is not set");

        let unknown = fetch_failed("news", &BriefingError::NotFound("category xyz".into()));
        assert_eq!(unknown, "Could not fetch news: category xyz");
    }

    #[test]
    fn test_stock_quote_shows_one_day_move() {
        assert_eq!(
            stock_quote("TCS.NS", 3850.0, Some(3600.0)),
            "Latest stock price of TCS.NS: ₹3850.00\n1-day change: ↑ ₹250.00 (↑ 6.94%)"
        );
        assert_eq!(
            stock_quote("SBIN.NS", 760.0, Some(800.0)),
            "Latest stock price of SBIN.NS: ₹760.00\n1-day change: ↓ ₹40.00 (↓ 5.00%)"
        );
        assert_eq!(
            stock_quote("ITC.NS", 450.0, Some(450.0)),
            "Latest stock price of ITC.NS: ₹450.00\n1-day change: → ₹0.00 (→ 0.00%)"
        );
        assert_eq!(stock_quote("ITC.NS", 450.0, None), stock_price("ITC.NS", 450.0));
    }

    #[test]
    fn test_insights() {
        assert_eq!(insights("Title", &[]), NO_INSIGHTS);
        let text = insights("Title", &["One.".to_string(), "Two.".to_string()]);
        assert_eq!(text, "Title\n\nOne.\n\nTwo.");
    }
}
