use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::schema::{history, portfolios};

use super::portfolios_errors::PortfolioError;
use super::portfolios_model::{
    HistoryEntry, HistoryEntryDB, NewPortfolio, Portfolio, PortfolioDB,
};
use super::Result;

/// Repository for portfolio and history rows
#[derive(Default)]
pub struct PortfolioRepository;

impl PortfolioRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, conn: &mut SqliteConnection, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        let exists = portfolios::table
            .filter(portfolios::user_id.eq(&new_portfolio.user_id))
            .count()
            .get_result::<i64>(conn)?
            > 0;
        if exists {
            return Err(PortfolioError::AlreadyExists(format!(
                "User {} already owns a portfolio",
                new_portfolio.user_id
            )));
        }

        let portfolio_db: PortfolioDB = new_portfolio.into();

        diesel::insert_into(portfolios::table)
            .values(&portfolio_db)
            .execute(conn)?;

        Ok(portfolio_db.into())
    }

    pub fn get_by_id(&self, conn: &mut SqliteConnection, portfolio_id: &str) -> Result<Portfolio> {
        portfolios::table
            .find(portfolio_id)
            .first::<PortfolioDB>(conn)
            .map(Portfolio::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => PortfolioError::NotFound(format!(
                    "Portfolio with id {} not found",
                    portfolio_id
                )),
                _ => PortfolioError::DatabaseError(e.to_string()),
            })
    }

    pub fn get_by_user(&self, conn: &mut SqliteConnection, user_id: &str) -> Result<Portfolio> {
        portfolios::table
            .filter(portfolios::user_id.eq(user_id))
            .first::<PortfolioDB>(conn)
            .map(Portfolio::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => PortfolioError::NotFound(format!(
                    "User {} does not have a portfolio",
                    user_id
                )),
                _ => PortfolioError::DatabaseError(e.to_string()),
            })
    }

    pub fn list_all(&self, conn: &mut SqliteConnection) -> Result<Vec<Portfolio>> {
        portfolios::table
            .load::<PortfolioDB>(conn)
            .map(|rows| rows.into_iter().map(Portfolio::from).collect())
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }

    pub fn update_cash(
        &self,
        conn: &mut SqliteConnection,
        portfolio_id: &str,
        new_cash: f64,
    ) -> Result<()> {
        diesel::update(portfolios::table.find(portfolio_id))
            .set(portfolios::available_cash.eq(new_cash))
            .execute(conn)?;
        Ok(())
    }

    /// Writes a freshly computed total value and stamps the valuation time.
    pub fn set_valuation(
        &self,
        conn: &mut SqliteConnection,
        portfolio_id: &str,
        total_value: f64,
        valued_at: NaiveDateTime,
    ) -> Result<()> {
        diesel::update(portfolios::table.find(portfolio_id))
            .set((
                portfolios::updated_value.eq(total_value),
                portfolios::updated_at.eq(valued_at),
            ))
            .execute(conn)?;
        Ok(())
    }

    /// Copies the current value into the close-of-day column.
    pub fn snapshot_close(&self, conn: &mut SqliteConnection, portfolio_id: &str) -> Result<()> {
        let current: f64 = portfolios::table
            .find(portfolio_id)
            .select(portfolios::updated_value)
            .first(conn)?;

        diesel::update(portfolios::table.find(portfolio_id))
            .set(portfolios::last_close_value.eq(current))
            .execute(conn)?;
        Ok(())
    }

    pub fn append_history(
        &self,
        conn: &mut SqliteConnection,
        portfolio_id: &str,
        portfolio_value: f64,
        recorded_at: NaiveDateTime,
    ) -> Result<HistoryEntry> {
        let entry = HistoryEntryDB {
            id: uuid::Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.to_string(),
            recorded_at,
            portfolio_value,
        };

        diesel::insert_into(history::table)
            .values(&entry)
            .execute(conn)?;

        Ok(entry.into())
    }

    pub fn history_for_portfolio(
        &self,
        conn: &mut SqliteConnection,
        portfolio_id: &str,
    ) -> Result<Vec<HistoryEntry>> {
        history::table
            .filter(history::portfolio_id.eq(portfolio_id))
            .order(history::recorded_at.asc())
            .load::<HistoryEntryDB>(conn)
            .map(|rows| rows.into_iter().map(HistoryEntry::from).collect())
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }

    /// Timestamp of the most recent valuation across all portfolios.
    pub fn last_updated_at(&self, conn: &mut SqliteConnection) -> Result<Option<NaiveDateTime>> {
        portfolios::table
            .select(diesel::dsl::max(portfolios::updated_at))
            .first::<Option<NaiveDateTime>>(conn)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }

    /// Appends the inception snapshot for a newly created portfolio.
    pub fn append_inception_history(
        &self,
        conn: &mut SqliteConnection,
        portfolio: &Portfolio,
    ) -> Result<HistoryEntry> {
        self.append_history(
            conn,
            &portfolio.id,
            portfolio.updated_value,
            Utc::now().naive_utc(),
        )
    }
}
