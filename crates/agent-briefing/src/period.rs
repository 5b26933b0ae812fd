//! Look-back periods for stock price history
//!
//! A period is written `<integer><unit>` where the unit is `d` (days), `mo`
//! (months) or `y` (years), e.g. `1d`, `3mo`, `1y`.

use crate::error::{BriefingError, Result};
use std::fmt;
use std::str::FromStr;

/// Unit of a [`Period`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodUnit {
    Day,
    Month,
    Year,
}

impl PeriodUnit {
    /// Short token used in the normalized form
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Month => "mo",
            Self::Year => "y",
        }
    }

    /// Accept either the normalized token or the spoken word (`day`, `month`, `year`).
    ///
    /// Plural forms are accepted as well.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "d" | "day" | "days" => Some(Self::Day),
            "mo" | "month" | "months" => Some(Self::Month),
            "y" | "year" | "years" => Some(Self::Year),
            _ => None,
        }
    }

    fn approx_days(&self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Month => 30,
            Self::Year => 365,
        }
    }
}

/// A normalized look-back window such as `1d`, `3mo` or `2y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    count: u32,
    unit: PeriodUnit,
}

impl Period {
    /// Create a period; the count must be at least one.
    pub fn new(count: u32, unit: PeriodUnit) -> Result<Self> {
        if count == 0 {
            return Err(BriefingError::Parse(
                "period length must be at least 1".to_string(),
            ));
        }
        Ok(Self { count, unit })
    }

    /// A single trading day, the window used for latest-price lookups
    pub const fn one_day() -> Self {
        Self {
            count: 1,
            unit: PeriodUnit::Day,
        }
    }

    /// Five trading days, enough to hold the previous close
    pub const fn trading_week() -> Self {
        Self {
            count: 5,
            unit: PeriodUnit::Day,
        }
    }

    /// Build a period from the two halves of a spoken phrase such as `"3"` and `"months"`.
    pub fn from_spoken(count: &str, unit: &str) -> Result<Self> {
        let count: u32 = count
            .trim()
            .parse()
            .map_err(|_| BriefingError::Parse(format!("invalid period length: {count}")))?;
        let unit = PeriodUnit::from_token(unit.trim())
            .ok_or_else(|| BriefingError::Parse(format!("invalid period unit: {unit}")))?;
        Self::new(count, unit)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    /// Calendar days covered, with months as 30 days and years as 365
    pub fn approx_days(&self) -> i64 {
        i64::from(self.count) * self.unit.approx_days()
    }

    /// The same window as a Yahoo Finance chart `range` value, when Yahoo
    /// supports it directly.
    pub fn as_yahoo_range(&self) -> Option<&'static str> {
        match (self.count, self.unit) {
            (1, PeriodUnit::Day) => Some("1d"),
            (5, PeriodUnit::Day) => Some("5d"),
            (1, PeriodUnit::Month) => Some("1mo"),
            (3, PeriodUnit::Month) => Some("3mo"),
            (6, PeriodUnit::Month) => Some("6mo"),
            (1, PeriodUnit::Year) => Some("1y"),
            (2, PeriodUnit::Year) => Some("2y"),
            (5, PeriodUnit::Year) => Some("5y"),
            (10, PeriodUnit::Year) => Some("10y"),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for Period {
    type Err = BriefingError;

    /// Parse the normalized form only: digits followed directly by `d`, `mo` or `y`.
    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| BriefingError::Parse(format!("period has no unit: {s}")))?;
        let (digits, unit) = s.split_at(split);
        if digits.is_empty() {
            return Err(BriefingError::Parse(format!("period has no length: {s}")));
        }

        let unit = match unit {
            "d" => PeriodUnit::Day,
            "mo" => PeriodUnit::Month,
            "y" => PeriodUnit::Year,
            _ => return Err(BriefingError::Parse(format!("invalid period unit in {s}"))),
        };
        let count = digits
            .parse()
            .map_err(|_| BriefingError::Parse(format!("period length out of range: {s}")))?;

        Self::new(count, unit)
    }
}
