use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_FIELD;

/// Snapshot of everything the price source knows about a ticker.
///
/// Every field except `symbol` and `price` is optional: the upstream API
/// routinely returns partial data, and callers fall back to the documented
/// defaults (`"n/a"` for strings, the previously stored figure for prices)
/// instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
    pub open: Option<f64>,
    pub currency: Option<String>,
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub company_summary: Option<String>,
    pub week52_high: Option<f64>,
    pub week52_low: Option<f64>,
}

impl StockQuote {
    pub fn currency_or_default(&self) -> String {
        self.currency.clone().unwrap_or_else(|| UNKNOWN_FIELD.to_string())
    }

    pub fn company_name_or_default(&self) -> String {
        self.company_name
            .clone()
            .unwrap_or_else(|| self.symbol.clone())
    }

    /// Price change since the open; `None` when the open is unknown.
    pub fn day_change(&self) -> Option<f64> {
        self.open.map(|open| self.price - open)
    }

    /// Percent change since the open; `None` when the open is unknown or zero.
    pub fn day_change_pct(&self) -> Option<f64> {
        match self.open {
            Some(open) if open != 0.0 => Some((self.price / open - 1.0) * 100.0),
            _ => None,
        }
    }
}

/// One bar of a ticker's daily price history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A news article related to a ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub headline: String,
    pub url: String,
}

/// Lookback window for historical price requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryPeriod {
    OneMonth,
    SixMonths,
    OneYear,
    FiveYears,
    Max,
}

impl Default for HistoryPeriod {
    fn default() -> Self {
        HistoryPeriod::FiveYears
    }
}

impl HistoryPeriod {
    /// Range token understood by the upstream chart API.
    pub fn as_range(&self) -> &'static str {
        match self {
            HistoryPeriod::OneMonth => "1mo",
            HistoryPeriod::SixMonths => "6mo",
            HistoryPeriod::OneYear => "1y",
            HistoryPeriod::FiveYears => "5y",
            HistoryPeriod::Max => "max",
        }
    }
}
