use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::constants::UNKNOWN_SECTOR;
use crate::db::{get_connection, DbPool};
use crate::valuation;

use super::holdings_errors::HoldingError;
use super::holdings_model::{BreakdownSlice, Holding, HoldingWithMetrics};
use super::holdings_repository::HoldingRepository;
use super::Result;

/// Service for reading holdings and their display metrics
pub struct HoldingsService {
    pool: Arc<DbPool>,
    repository: HoldingRepository,
}

impl HoldingsService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            repository: HoldingRepository::new(),
        }
    }

    pub fn get_holding(&self, portfolio_id: &str, ticker: &str) -> Result<Holding> {
        let mut conn = self.db_conn()?;
        self.repository.get(&mut conn, portfolio_id, ticker)
    }

    pub fn list_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let mut conn = self.db_conn()?;
        self.repository.list_for_portfolio(&mut conn, portfolio_id)
    }

    /// Holdings of a portfolio with market value, day change and total
    /// change attached.
    pub fn holdings_with_metrics(&self, portfolio_id: &str) -> Result<Vec<HoldingWithMetrics>> {
        let holdings = self.list_holdings(portfolio_id)?;

        Ok(holdings
            .into_iter()
            .map(|holding| {
                let valuation = valuation::holding_valuation(
                    decimal(holding.average_price),
                    decimal(holding.updated_price),
                    decimal(holding.opening_price),
                    holding.shares,
                );
                HoldingWithMetrics { holding, valuation }
            })
            .collect())
    }

    /// Market value per sector; holdings without a sector fall under
    /// "Unknown".
    pub fn sector_breakdown(&self, portfolio_id: &str) -> Result<Vec<BreakdownSlice>> {
        let holdings = self.list_holdings(portfolio_id)?;

        let mut slices: BTreeMap<String, f64> = BTreeMap::new();
        for holding in &holdings {
            let sector = holding
                .sector
                .clone()
                .unwrap_or_else(|| UNKNOWN_SECTOR.to_string());
            *slices.entry(sector).or_insert(0.0) +=
                holding.updated_price * holding.shares as f64;
        }

        Ok(to_slices(slices))
    }

    /// Market value per ticker.
    pub fn allocation_breakdown(&self, portfolio_id: &str) -> Result<Vec<BreakdownSlice>> {
        let holdings = self.list_holdings(portfolio_id)?;

        let mut slices: BTreeMap<String, f64> = BTreeMap::new();
        for holding in &holdings {
            *slices.entry(holding.ticker.clone()).or_insert(0.0) +=
                holding.updated_price * holding.shares as f64;
        }

        Ok(to_slices(slices))
    }

    fn db_conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| HoldingError::DatabaseError(e.to_string()))
    }
}

fn to_slices(map: BTreeMap<String, f64>) -> Vec<BreakdownSlice> {
    map.into_iter()
        .map(|(label, value)| BreakdownSlice { label, value })
        .collect()
}

fn decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}
