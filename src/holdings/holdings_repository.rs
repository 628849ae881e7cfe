use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::schema::holdings;

use super::holdings_errors::HoldingError;
use super::holdings_model::{Holding, HoldingDB, NewHolding};
use super::Result;

/// Repository for holding rows
#[derive(Default)]
pub struct HoldingRepository;

impl HoldingRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn insert(&self, conn: &mut SqliteConnection, new_holding: NewHolding) -> Result<Holding> {
        let holding_db: HoldingDB = new_holding.into();

        diesel::insert_into(holdings::table)
            .values(&holding_db)
            .execute(conn)?;

        Ok(holding_db.into())
    }

    pub fn find(
        &self,
        conn: &mut SqliteConnection,
        portfolio_id: &str,
        ticker: &str,
    ) -> Result<Option<Holding>> {
        holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .filter(holdings::ticker.eq(ticker))
            .first::<HoldingDB>(conn)
            .optional()
            .map(|row| row.map(Holding::from))
            .map_err(|e| HoldingError::DatabaseError(e.to_string()))
    }

    pub fn get(
        &self,
        conn: &mut SqliteConnection,
        portfolio_id: &str,
        ticker: &str,
    ) -> Result<Holding> {
        self.find(conn, portfolio_id, ticker)?.ok_or_else(|| {
            HoldingError::NotFound(format!(
                "No holding of {} in portfolio {}",
                ticker, portfolio_id
            ))
        })
    }

    pub fn list_for_portfolio(
        &self,
        conn: &mut SqliteConnection,
        portfolio_id: &str,
    ) -> Result<Vec<Holding>> {
        holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .order(holdings::ticker.asc())
            .load::<HoldingDB>(conn)
            .map(|rows| rows.into_iter().map(Holding::from).collect())
            .map_err(|e| HoldingError::DatabaseError(e.to_string()))
    }

    pub fn list_all(&self, conn: &mut SqliteConnection) -> Result<Vec<Holding>> {
        holdings::table
            .load::<HoldingDB>(conn)
            .map(|rows| rows.into_iter().map(Holding::from).collect())
            .map_err(|e| HoldingError::DatabaseError(e.to_string()))
    }

    /// Updates the accumulated position after a buy into an existing
    /// holding: new weighted average, share count and last trade price.
    pub fn apply_buy(
        &self,
        conn: &mut SqliteConnection,
        holding_id: &str,
        new_shares: i64,
        new_average: f64,
        trade_price: f64,
    ) -> Result<()> {
        diesel::update(holdings::table.find(holding_id))
            .set((
                holdings::shares.eq(new_shares),
                holdings::average_price.eq(new_average),
                holdings::updated_price.eq(trade_price),
            ))
            .execute(conn)?;
        Ok(())
    }

    /// Decrements shares after a partial sell; average and opening price
    /// stay as they are.
    pub fn apply_partial_sell(
        &self,
        conn: &mut SqliteConnection,
        holding_id: &str,
        remaining_shares: i64,
    ) -> Result<()> {
        diesel::update(holdings::table.find(holding_id))
            .set(holdings::shares.eq(remaining_shares))
            .execute(conn)?;
        Ok(())
    }

    pub fn delete(&self, conn: &mut SqliteConnection, holding_id: &str) -> Result<()> {
        diesel::delete(holdings::table.find(holding_id)).execute(conn)?;
        Ok(())
    }

    /// Applies a freshly fetched price to every holding of a ticker,
    /// across all portfolios.
    pub fn set_price_for_ticker(
        &self,
        conn: &mut SqliteConnection,
        ticker: &str,
        price: f64,
    ) -> Result<usize> {
        Ok(diesel::update(holdings::table.filter(holdings::ticker.eq(ticker)))
            .set(holdings::updated_price.eq(price))
            .execute(conn)?)
    }

    /// Applies a fresh opening price to every holding of a ticker not yet
    /// stamped with today's date. Returns the number of rows written.
    pub fn set_opening_price_for_ticker(
        &self,
        conn: &mut SqliteConnection,
        ticker: &str,
        price: f64,
        today: NaiveDate,
    ) -> Result<usize> {
        Ok(diesel::update(
            holdings::table
                .filter(holdings::ticker.eq(ticker))
                .filter(
                    holdings::open_updated_on
                        .ne(Some(today))
                        .or(holdings::open_updated_on.is_null()),
                ),
        )
        .set((
            holdings::opening_price.eq(price),
            holdings::open_updated_on.eq(today),
        ))
        .execute(conn)?)
    }
}
