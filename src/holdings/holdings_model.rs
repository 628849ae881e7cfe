use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::portfolios::PortfolioDB;
use crate::valuation::HoldingValuation;

/// Domain model representing a position in one ticker.
///
/// A portfolio has at most one holding per ticker; the row disappears when
/// a sell takes its share count to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub portfolio_id: String,
    pub company_name: String,
    pub ticker: String,
    pub shares: i64,
    pub average_price: f64,
    pub updated_price: f64,
    pub opening_price: f64,
    /// Market-local date the opening price was last captured; guards the
    /// daily open refresh against double application.
    pub open_updated_on: Option<NaiveDate>,
    pub currency: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

/// Database model for holdings
#[derive(
    Queryable, Identifiable, Associations, Insertable, AsChangeset, Selectable, Debug, Clone,
)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(PortfolioDB, foreign_key = portfolio_id))]
pub struct HoldingDB {
    pub id: String,
    pub portfolio_id: String,
    pub company_name: String,
    pub ticker: String,
    pub shares: i64,
    pub average_price: f64,
    pub updated_price: f64,
    pub opening_price: f64,
    pub open_updated_on: Option<NaiveDate>,
    pub currency: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

/// Input model for opening a brand-new position. The trade price doubles
/// as average, current and opening price until the next refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub portfolio_id: String,
    pub company_name: String,
    pub ticker: String,
    pub shares: i64,
    pub price: f64,
    pub currency: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

/// A holding together with its display metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingWithMetrics {
    #[serde(flatten)]
    pub holding: Holding,
    pub valuation: HoldingValuation,
}

/// One labelled slice of a portfolio breakdown chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownSlice {
    pub label: String,
    pub value: f64,
}

impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Self {
            id: db.id,
            portfolio_id: db.portfolio_id,
            company_name: db.company_name,
            ticker: db.ticker,
            shares: db.shares,
            average_price: db.average_price,
            updated_price: db.updated_price,
            opening_price: db.opening_price,
            open_updated_on: db.open_updated_on,
            currency: db.currency,
            sector: db.sector,
            industry: db.industry,
        }
    }
}

impl From<NewHolding> for HoldingDB {
    fn from(domain: NewHolding) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: domain.portfolio_id,
            company_name: domain.company_name,
            ticker: domain.ticker,
            shares: domain.shares,
            average_price: domain.price,
            updated_price: domain.price,
            opening_price: domain.price,
            open_updated_on: None,
            currency: domain.currency,
            sector: domain.sector,
            industry: domain.industry,
        }
    }
}
