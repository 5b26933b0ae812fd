//! Stock identifier resolution
//!
//! Turns whatever the user typed (a ticker or a company name) into an
//! exchange-qualified Yahoo Finance symbol such as `TCS.NS`.

use crate::api::SymbolLookup;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Indian exchanges a symbol can be qualified with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Exchange {
    /// National Stock Exchange (`.NS`)
    #[default]
    Nse,
    /// Bombay Stock Exchange (`.BO`)
    Bse,
}

impl Exchange {
    pub const ALL: [Exchange; 2] = [Exchange::Nse, Exchange::Bse];

    /// Yahoo Finance symbol suffix, including the dot
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Nse => ".NS",
            Self::Bse => ".BO",
        }
    }

    /// The exchange a symbol is already qualified with, if any
    pub fn of_symbol(symbol: &str) -> Option<Self> {
        let upper = symbol.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|exchange| upper.ends_with(exchange.suffix()) && upper.len() > 3)
    }
}

impl std::str::FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nse" | "ns" | ".ns" => Ok(Self::Nse),
            "bse" | "bo" | ".bo" => Ok(Self::Bse),
            other => Err(format!("unknown exchange: {other}")),
        }
    }
}

/// Resolves raw identifiers to qualified symbols.
///
/// The lookup capability is passed in at construction and kept for the life of
/// the resolver; nothing is refreshed behind the caller's back.
#[derive(Clone)]
pub struct SymbolResolver {
    lookup: Arc<dyn SymbolLookup>,
    default_exchange: Exchange,
}

impl SymbolResolver {
    pub fn new(lookup: Arc<dyn SymbolLookup>, default_exchange: Exchange) -> Self {
        Self {
            lookup,
            default_exchange,
        }
    }

    /// Resolve a raw identifier. Never fails: lookup errors fall back to the raw text.
    pub async fn resolve(&self, raw: &str) -> String {
        let raw = raw.trim();

        if Exchange::of_symbol(raw).is_some() {
            return raw.to_ascii_uppercase();
        }

        let symbol = if is_literal_ticker(raw) {
            raw.to_ascii_uppercase()
        } else {
            match self.lookup.lookup(raw).await {
                Ok(Some(found)) => {
                    tracing::debug!(query = raw, symbol = %found, "Symbol lookup matched");
                    found.trim().to_ascii_uppercase()
                }
                Ok(None) => {
                    tracing::debug!(query = raw, "Symbol lookup found nothing, using raw text");
                    raw.to_ascii_uppercase()
                }
                Err(e) => {
                    tracing::warn!(query = raw, error = %e, "Symbol lookup failed, using raw text");
                    raw.to_ascii_uppercase()
                }
            }
        };

        self.qualify(&symbol)
    }

    /// Append the default exchange suffix unless one is already present
    pub fn qualify(&self, symbol: &str) -> String {
        if Exchange::of_symbol(symbol).is_some() {
            symbol.to_string()
        } else {
            format!("{symbol}{}", self.default_exchange.suffix())
        }
    }
}

impl std::fmt::Debug for SymbolResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolResolver")
            .field("default_exchange", &self.default_exchange)
            .finish_non_exhaustive()
    }
}

/// Purely alphabetic input is taken as a ticker as-is
fn is_literal_ticker(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSymbolLookup;
    use crate::error::BriefingError;

    fn resolver(lookup: MockSymbolLookup) -> SymbolResolver {
        SymbolResolver::new(Arc::new(lookup), Exchange::Nse)
    }

    #[test]
    fn test_exchange_suffixes() {
        assert_eq!(Exchange::of_symbol("TCS.NS"), Some(Exchange::Nse));
        assert_eq!(Exchange::of_symbol("reliance.bo"), Some(Exchange::Bse));
        assert_eq!(Exchange::of_symbol("TCS"), None);
        assert_eq!(Exchange::of_symbol(".NS"), None);
        assert_eq!("bse".parse::<Exchange>().unwrap(), Exchange::Bse);
        assert!("nyse".parse::<Exchange>().is_err());
    }

    #[tokio::test]
    async fn test_literal_ticker_skips_lookup() {
        let mut lookup = MockSymbolLookup::new();
        lookup.expect_lookup().never();

        assert_eq!(resolver(lookup).resolve("tcs").await, "TCS.NS");
    }

    #[tokio::test]
    async fn test_qualified_symbol_is_unchanged() {
        let mut lookup = MockSymbolLookup::new();
        lookup.expect_lookup().never();
        let resolver = resolver(lookup);

        assert_eq!(resolver.resolve("TCS.NS").await, "TCS.NS");
        assert_eq!(resolver.resolve("RELIANCE.BO").await, "RELIANCE.BO");

        let once = resolver.resolve("TCS.NS").await;
        assert_eq!(resolver.resolve(&once).await, once);
    }

    #[tokio::test]
    async fn test_company_name_uses_first_match() {
        let mut lookup = MockSymbolLookup::new();
        lookup
            .expect_lookup()
            .withf(|q| q.to_string() == "tata motors")
            .times(1)
            .returning(|_| Ok(Some("TATAMOTORS.NS".to_string())));

        assert_eq!(resolver(lookup).resolve("tata motors").await, "TATAMOTORS.NS");
    }

    #[tokio::test]
    async fn test_lookup_result_without_suffix_is_qualified() {
        let mut lookup = MockSymbolLookup::new();
        lookup
            .expect_lookup()
            .returning(|_| Ok(Some("M&M".to_string())));

        assert_eq!(resolver(lookup).resolve("mahindra & mahindra").await, "M&M.NS");
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_raw_text() {
        let mut lookup = MockSymbolLookup::new();
        lookup
            .expect_lookup()
            .returning(|_| Err(BriefingError::Transport("connection refused".into())));

        assert_eq!(resolver(lookup).resolve("bajaj auto").await, "BAJAJ AUTO.NS");
    }

    #[tokio::test]
    async fn test_lookup_miss_falls_back_to_raw_text() {
        let mut lookup = MockSymbolLookup::new();
        lookup.expect_lookup().returning(|_| Ok(None));

        let resolver = SymbolResolver::new(Arc::new(lookup), Exchange::Bse);
        assert_eq!(resolver.resolve("m&m").await, "M&M.BO");
    }
}
