use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::portfolios::PortfolioDB;

pub const TRADE_SIDE_BUY: &str = "BUY";
pub const TRADE_SIDE_SELL: &str = "SELL";

/// Which way a trade went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => TRADE_SIDE_BUY,
            TradeSide::Sell => TRADE_SIDE_SELL,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            TRADE_SIDE_BUY => Ok(TradeSide::Buy),
            TRADE_SIDE_SELL => Ok(TradeSide::Sell),
            other => Err(format!("Unknown trade side: {}", other)),
        }
    }
}

/// Domain model for one entry of the append-only trade ledger.
/// Rows are written once and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub portfolio_id: String,
    pub executed_at: DateTime<Utc>,
    pub side: TradeSide,
    pub company_name: String,
    pub ticker: String,
    pub currency: String,
    pub shares: i64,
    pub price_per_share: f64,
    pub total_value: f64,
}

/// Database model for ledger entries
#[derive(Queryable, Identifiable, Associations, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(PortfolioDB, foreign_key = portfolio_id))]
pub struct TransactionDB {
    pub id: String,
    pub portfolio_id: String,
    pub executed_at: NaiveDateTime,
    pub side: String,
    pub company_name: String,
    pub ticker: String,
    pub currency: String,
    pub shares: i64,
    pub price_per_share: f64,
    pub total_value: f64,
}

/// Input model for appending a ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub portfolio_id: String,
    pub side: TradeSide,
    pub company_name: String,
    pub ticker: String,
    pub currency: String,
    pub shares: i64,
    pub price_per_share: f64,
    pub total_value: f64,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            portfolio_id: db.portfolio_id,
            executed_at: DateTime::from_naive_utc_and_offset(db.executed_at, Utc),
            side: TradeSide::from_str(&db.side).unwrap_or(TradeSide::Buy),
            company_name: db.company_name,
            ticker: db.ticker,
            currency: db.currency,
            shares: db.shares,
            price_per_share: db.price_per_share,
            total_value: db.total_value,
        }
    }
}

impl From<NewTransaction> for TransactionDB {
    fn from(domain: NewTransaction) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: domain.portfolio_id,
            executed_at: Utc::now().naive_utc(),
            side: domain.side.as_str().to_string(),
            company_name: domain.company_name,
            ticker: domain.ticker,
            currency: domain.currency,
            shares: domain.shares,
            price_per_share: domain.price_per_share,
            total_value: domain.total_value,
        }
    }
}
