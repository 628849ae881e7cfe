use std::sync::Arc;

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::STARTING_FUNDS;
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result, ValidationError};
use crate::schema::{portfolios, users};
use crate::utils::market_date_today;
use crate::valuation::round_money;

use super::ranking_model::{DailyPerformer, RankLabel, RankedPerformer};

/// Leaderboards across all portfolios.
pub struct RankingService {
    pool: Arc<DbPool>,
}

/// One portfolio joined with its owner's username, the only data the
/// leaderboards need.
#[derive(Debug, Clone, Queryable)]
struct LeaderboardRow {
    username: String,
    updated_value: f64,
    last_close_value: f64,
    created_on: NaiveDate,
}

impl RankingService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// All-time leaderboard: portfolios by current value, change measured
    /// against starting funds.
    pub fn top_performers(&self) -> Result<Vec<RankedPerformer>> {
        let rows = self.load_rows()?;
        rank_all_time(rows, market_date_today())
    }

    /// Daily leaderboard: portfolios by growth since the last market close.
    pub fn top_daily_performers(&self) -> Result<Vec<DailyPerformer>> {
        let rows = self.load_rows()?;
        rank_daily(rows)
    }

    fn load_rows(&self) -> Result<Vec<LeaderboardRow>> {
        let mut conn = get_connection(&self.pool)?;

        Ok(portfolios::table
            .inner_join(users::table)
            .select((
                users::username,
                portfolios::updated_value,
                portfolios::last_close_value,
                portfolios::created_on,
            ))
            .load::<LeaderboardRow>(&mut conn)?)
    }
}

fn rank_all_time(
    mut rows: Vec<LeaderboardRow>,
    today: NaiveDate,
) -> Result<Vec<RankedPerformer>> {
    rows.sort_by(|a, b| {
        b.updated_value
            .partial_cmp(&a.updated_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut board = Vec::with_capacity(rows.len());
    let mut previous_value: Option<Decimal> = None;

    for (index, row) in rows.into_iter().enumerate() {
        let value = decimal(row.updated_value)?;

        // A repeat of the value above shows as a dash; the next distinct
        // value picks its positional rank back up.
        let rank = if previous_value == Some(value) {
            RankLabel::Tied
        } else {
            RankLabel::Position(index + 1)
        };
        previous_value = Some(value);

        let change_pct = round_money((value / STARTING_FUNDS - Decimal::ONE) * dec!(100));
        let age_days = (today - row.created_on).num_days();
        let daily_change_pct = if age_days > 0 {
            Some(to_f64(round_money(change_pct / Decimal::from(age_days)))?)
        } else {
            None
        };

        board.push(RankedPerformer {
            rank,
            username: row.username,
            portfolio_value: row.updated_value,
            change_pct: to_f64(change_pct)?,
            age_days,
            daily_change_pct,
        });
    }

    Ok(board)
}

fn rank_daily(rows: Vec<LeaderboardRow>) -> Result<Vec<DailyPerformer>> {
    struct Scored {
        username: String,
        total_value: f64,
        day_change: Decimal,
        day_change_pct: Option<Decimal>,
        ratio: Option<Decimal>,
    }

    let mut scored = Vec::with_capacity(rows.len());
    for row in rows {
        let value = decimal(row.updated_value)?;
        let close = decimal(row.last_close_value)?;

        let ratio = if close.is_zero() {
            None
        } else {
            Some(value / close)
        };

        scored.push(Scored {
            username: row.username,
            total_value: row.updated_value,
            day_change: round_money(value - close),
            day_change_pct: ratio.map(|r| round_money((r - Decimal::ONE) * dec!(100))),
            ratio,
        });
    }

    // Highest growth first; portfolios without a usable close sink to the
    // bottom.
    scored.sort_by(|a, b| match (b.ratio, a.ratio) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut board = Vec::with_capacity(scored.len());
    let mut previous_pct: Option<Option<Decimal>> = None;

    for (index, row) in scored.into_iter().enumerate() {
        // Ties are detected on the displayed (rounded) percentage, not the
        // raw ratio.
        let rank = if previous_pct == Some(row.day_change_pct) {
            RankLabel::Tied
        } else {
            RankLabel::Position(index + 1)
        };
        previous_pct = Some(row.day_change_pct);

        board.push(DailyPerformer {
            rank,
            username: row.username,
            day_change: to_f64(row.day_change)?,
            day_change_pct: row.day_change_pct.map(to_f64).transpose()?,
            total_value: row.total_value,
        });
    }

    Ok(board)
}

fn decimal(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "Amount {} is not representable",
            value
        )))
    })
}

fn to_f64(value: Decimal) -> Result<f64> {
    value.to_f64().ok_or_else(|| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "Amount {} is not representable",
            value
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: &str, value: f64, close: f64, created_on: NaiveDate) -> LeaderboardRow {
        LeaderboardRow {
            username: username.to_string(),
            updated_value: value,
            last_close_value: close,
            created_on,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn all_time_ranks_by_value_descending() {
        let today = day(2024, 9, 10);
        let board = rank_all_time(
            vec![
                row("alice", 9000.0, 9000.0, day(2024, 9, 1)),
                row("bob", 12000.0, 12000.0, day(2024, 9, 1)),
            ],
            today,
        )
        .unwrap();

        assert_eq!(board[0].username, "bob");
        assert_eq!(board[0].rank, RankLabel::Position(1));
        assert_eq!(board[0].change_pct, 20.0);
        assert_eq!(board[1].username, "alice");
        assert_eq!(board[1].rank, RankLabel::Position(2));
        assert_eq!(board[1].change_pct, -10.0);
    }

    #[test]
    fn all_time_ties_show_dash_and_rank_resumes() {
        let today = day(2024, 9, 10);
        let board = rank_all_time(
            vec![
                row("alice", 11000.0, 11000.0, day(2024, 9, 1)),
                row("bob", 11000.0, 11000.0, day(2024, 9, 1)),
                row("carol", 10500.0, 10500.0, day(2024, 9, 1)),
            ],
            today,
        )
        .unwrap();

        assert_eq!(board[0].rank, RankLabel::Position(1));
        assert_eq!(board[1].rank, RankLabel::Tied);
        assert_eq!(board[2].rank, RankLabel::Position(3));
    }

    #[test]
    fn all_time_daily_average_needs_a_full_day() {
        let today = day(2024, 9, 11);
        let board = rank_all_time(
            vec![
                row("fresh", 10000.0, 10000.0, today),
                row("aged", 11000.0, 11000.0, day(2024, 9, 1)),
            ],
            today,
        )
        .unwrap();

        let fresh = board.iter().find(|r| r.username == "fresh").unwrap();
        assert_eq!(fresh.daily_change_pct, None);

        let aged = board.iter().find(|r| r.username == "aged").unwrap();
        assert_eq!(aged.age_days, 10);
        assert_eq!(aged.daily_change_pct, Some(1.0));
    }

    #[test]
    fn daily_ranks_by_growth_since_close() {
        let created = day(2024, 9, 1);
        let board = rank_daily(vec![
            row("flat", 10000.0, 10000.0, created),
            row("up", 10100.0, 10000.0, created),
            row("down", 9900.0, 10000.0, created),
        ])
        .unwrap();

        assert_eq!(board[0].username, "up");
        assert_eq!(board[0].day_change, 100.0);
        assert_eq!(board[0].day_change_pct, Some(1.0));
        assert_eq!(board[1].username, "flat");
        assert_eq!(board[2].username, "down");
        assert_eq!(board[2].day_change_pct, Some(-1.0));
    }

    #[test]
    fn daily_ties_on_rounded_percent() {
        let created = day(2024, 9, 1);
        // 1.0041% and 1.0039% both display as 1.00%.
        let board = rank_daily(vec![
            row("a", 10100.41, 10000.0, created),
            row("b", 10100.39, 10000.0, created),
            row("c", 10000.0, 10000.0, created),
        ])
        .unwrap();

        assert_eq!(board[0].rank, RankLabel::Position(1));
        assert_eq!(board[0].day_change_pct, Some(1.0));
        assert_eq!(board[1].rank, RankLabel::Tied);
        assert_eq!(board[2].rank, RankLabel::Position(3));
    }

    #[test]
    fn daily_guards_missing_close() {
        let board = rank_daily(vec![
            row("normal", 10100.0, 10000.0, day(2024, 9, 1)),
            row("odd", 10100.0, 0.0, day(2024, 9, 1)),
        ])
        .unwrap();

        assert_eq!(board[0].username, "normal");
        assert_eq!(board[1].username, "odd");
        assert_eq!(board[1].day_change_pct, None);
    }

    #[test]
    fn empty_set_gives_empty_boards() {
        assert!(rank_all_time(vec![], day(2024, 9, 1)).unwrap().is_empty());
        assert!(rank_daily(vec![]).unwrap().is_empty());
    }
}
