use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Position on a leaderboard.
///
/// A row whose sort key equals the row above it shows a dash instead of a
/// number; the next distinct value resumes at its 1-based position, so a
/// board can read 1, -, 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankLabel {
    Position(usize),
    Tied,
}

impl Serialize for RankLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RankLabel::Position(n) => serializer.serialize_u64(*n as u64),
            RankLabel::Tied => serializer.serialize_str("-"),
        }
    }
}

impl<'de> Deserialize<'de> for RankLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(RankLabel::Position(n as usize)),
            Raw::Text(s) if s == "-" => Ok(RankLabel::Tied),
            Raw::Text(s) => Err(serde::de::Error::custom(format!("invalid rank: {}", s))),
        }
    }
}

impl fmt::Display for RankLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankLabel::Position(n) => write!(f, "{}", n),
            RankLabel::Tied => f.write_str("-"),
        }
    }
}

/// One row of the all-time leaderboard, measured against starting funds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPerformer {
    pub rank: RankLabel,
    pub username: String,
    pub portfolio_value: f64,
    pub change_pct: f64,
    pub age_days: i64,
    /// Average percent change per day of the portfolio's life. `None` for
    /// portfolios created today.
    pub daily_change_pct: Option<f64>,
}

/// One row of the daily leaderboard, measured against the last close.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPerformer {
    pub rank: RankLabel,
    pub username: String,
    pub day_change: f64,
    /// `None` when the portfolio has no usable close to compare against.
    pub day_change_pct: Option<f64>,
    pub total_value: f64,
}
