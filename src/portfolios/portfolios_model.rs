use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::constants::STARTING_FUNDS;
use crate::users::UserDB;

/// Domain model representing a player's portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub user_id: String,
    pub available_cash: f64,
    pub created_on: NaiveDate,
    pub updated_value: f64,
    pub updated_at: DateTime<Utc>,
    pub last_close_value: f64,
}

/// Database model for portfolios
#[derive(
    Queryable, Identifiable, Associations, Insertable, AsChangeset, Selectable, Debug, Clone,
)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(UserDB, foreign_key = user_id))]
pub struct PortfolioDB {
    pub id: String,
    pub user_id: String,
    pub available_cash: f64,
    pub created_on: NaiveDate,
    pub updated_value: f64,
    pub updated_at: NaiveDateTime,
    pub last_close_value: f64,
}

/// Input model for creating a portfolio. Cash, value and close all start
/// at the configured starting funds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    pub user_id: String,
}

/// One immutable snapshot of a portfolio's total value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub portfolio_id: String,
    pub recorded_at: DateTime<Utc>,
    pub portfolio_value: f64,
}

/// Database model for history snapshots
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistoryEntryDB {
    pub id: String,
    pub portfolio_id: String,
    pub recorded_at: NaiveDateTime,
    pub portfolio_value: f64,
}

/// A (timestamp, value) point of a portfolio's performance curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePoint {
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

/// A labelled performance curve, one per portfolio on the comparison chart
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSeries {
    pub username: String,
    pub points: Vec<ValuePoint>,
}

impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            available_cash: db.available_cash,
            created_on: db.created_on,
            updated_value: db.updated_value,
            updated_at: DateTime::from_naive_utc_and_offset(db.updated_at, Utc),
            last_close_value: db.last_close_value,
        }
    }
}

impl From<NewPortfolio> for PortfolioDB {
    fn from(domain: NewPortfolio) -> Self {
        let starting = starting_funds_f64();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: domain.user_id,
            available_cash: starting,
            created_on: crate::utils::market_date_today(),
            updated_value: starting,
            updated_at: Utc::now().naive_utc(),
            last_close_value: starting,
        }
    }
}

impl From<HistoryEntryDB> for HistoryEntry {
    fn from(db: HistoryEntryDB) -> Self {
        Self {
            id: db.id,
            portfolio_id: db.portfolio_id,
            recorded_at: DateTime::from_naive_utc_and_offset(db.recorded_at, Utc),
            portfolio_value: db.portfolio_value,
        }
    }
}

pub(crate) fn starting_funds_f64() -> f64 {
    STARTING_FUNDS.to_f64().unwrap_or(10000.0)
}
