use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::schema::{history, portfolios, users};

use super::portfolios_errors::PortfolioError;
use super::portfolios_model::{
    HistoryEntry, NewPortfolio, PerformanceSeries, Portfolio, ValuePoint,
};
use super::portfolios_repository::PortfolioRepository;
use super::Result;

/// Service for managing portfolios and their value history
pub struct PortfolioService {
    pool: Arc<DbPool>,
    repository: PortfolioRepository,
}

impl PortfolioService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            repository: PortfolioRepository::new(),
        }
    }

    /// Creates a portfolio seeded with the starting funds and its inception
    /// history snapshot, atomically.
    pub fn create_portfolio(&self, user_id: &str) -> Result<Portfolio> {
        debug!("Creating portfolio for user {}", user_id);
        let mut conn = self.db_conn()?;

        conn.transaction::<Portfolio, PortfolioError, _>(|tx_conn| {
            let portfolio = self.repository.create(
                tx_conn,
                NewPortfolio {
                    user_id: user_id.to_string(),
                },
            )?;
            self.repository.append_inception_history(tx_conn, &portfolio)?;
            Ok(portfolio)
        })
    }

    pub fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = self.db_conn()?;
        self.repository.get_by_id(&mut conn, portfolio_id)
    }

    pub fn get_portfolio_for_user(&self, user_id: &str) -> Result<Portfolio> {
        let mut conn = self.db_conn()?;
        self.repository.get_by_user(&mut conn, user_id)
    }

    pub fn get_available_cash(&self, portfolio_id: &str) -> Result<f64> {
        Ok(self.get_portfolio(portfolio_id)?.available_cash)
    }

    /// The recorded value curve of one portfolio, oldest first.
    pub fn value_history(&self, portfolio_id: &str) -> Result<Vec<HistoryEntry>> {
        let mut conn = self.db_conn()?;
        self.repository.history_for_portfolio(&mut conn, portfolio_id)
    }

    /// One labelled curve per portfolio, for the comparison chart.
    pub fn performance_history(&self) -> Result<Vec<PerformanceSeries>> {
        let mut conn = self.db_conn()?;

        let rows: Vec<(String, String, chrono::NaiveDateTime, f64)> = portfolios::table
            .inner_join(users::table)
            .inner_join(history::table)
            .select((
                portfolios::id,
                users::username,
                history::recorded_at,
                history::portfolio_value,
            ))
            .order((portfolios::id.asc(), history::recorded_at.asc()))
            .load(&mut conn)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        let mut series: Vec<PerformanceSeries> = Vec::new();
        let mut current_id: Option<String> = None;

        for (portfolio_id, username, recorded_at, value) in rows {
            if current_id.as_deref() != Some(portfolio_id.as_str()) {
                series.push(PerformanceSeries {
                    username,
                    points: Vec::new(),
                });
                current_id = Some(portfolio_id);
            }
            if let Some(last) = series.last_mut() {
                last.points.push(ValuePoint {
                    recorded_at: DateTime::from_naive_utc_and_offset(recorded_at, Utc),
                    value,
                });
            }
        }

        Ok(series)
    }

    /// When the valuations were last refreshed, if any portfolio exists.
    pub fn last_updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        let mut conn = self.db_conn()?;
        Ok(self
            .repository
            .last_updated_at(&mut conn)?
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc)))
    }

    fn db_conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }
}
