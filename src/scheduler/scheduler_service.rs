use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Timelike, Utc};
use futures::future::join_all;
use log::{error, info, warn};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::db::{get_connection, DbPool};
use crate::holdings::HoldingRepository;
use crate::market_data::MarketDataService;
use crate::portfolios::PortfolioRepository;
use crate::utils::{is_market_hours, is_weekday, market_date_today, market_now};
use crate::valuation;

use super::scheduler_model::{JobId, JobOutcome};
use super::scheduler_repository::SchedulerRepository;
use super::{Result, SchedulerError};

/// Runs the recurring jobs that keep stored prices and portfolio values
/// current.
///
/// Every job is wrapped in the database-backed overlap guard: a trigger
/// that finds the previous run still in flight skips, which is an outcome,
/// not an error. A missed trigger heals on the next one.
pub struct SchedulerService {
    pool: Arc<DbPool>,
    market_data: Arc<MarketDataService>,
    repository: SchedulerRepository,
    holding_repository: HoldingRepository,
    portfolio_repository: PortfolioRepository,
}

impl SchedulerService {
    pub fn new(pool: Arc<DbPool>, market_data: Arc<MarketDataService>) -> Self {
        Self {
            pool,
            market_data,
            repository: SchedulerRepository::new(),
            holding_repository: HoldingRepository::new(),
            portfolio_repository: PortfolioRepository::new(),
        }
    }

    /// Refreshes the stored price of every held ticker, then revalues and
    /// snapshots every portfolio.
    pub async fn update_prices(&self) -> Result<JobOutcome> {
        if !self.acquire(JobId::UpdatePrices)? {
            warn!("update_prices skipped, previous run still in flight");
            return Ok(JobOutcome::Skipped);
        }

        let result = self.refresh_prices().await;
        self.finish(JobId::UpdatePrices);
        result?;
        Ok(JobOutcome::Completed)
    }

    /// Captures today's opening price for every held ticker. Re-running on
    /// the same market day is a no-op.
    pub async fn update_open(&self) -> Result<JobOutcome> {
        if !self.acquire(JobId::UpdateOpen)? {
            warn!("update_open skipped, previous run still in flight");
            return Ok(JobOutcome::Skipped);
        }

        let result = self.refresh_opens().await;
        self.finish(JobId::UpdateOpen);
        result?;
        Ok(JobOutcome::Completed)
    }

    /// Freezes every portfolio's current value as its close-of-day value.
    pub async fn update_close(&self) -> Result<JobOutcome> {
        if !self.acquire(JobId::UpdateClose)? {
            warn!("update_close skipped, previous run still in flight");
            return Ok(JobOutcome::Skipped);
        }

        let result = self.snapshot_closes();
        self.finish(JobId::UpdateClose);
        result?;
        Ok(JobOutcome::Completed)
    }

    fn acquire(&self, job: JobId) -> Result<bool> {
        let mut conn = self.connection()?;
        self.repository.ensure_job(&mut conn, job)?;
        self.repository.try_acquire(&mut conn, job)
    }

    fn finish(&self, job: JobId) {
        let released = self
            .connection()
            .and_then(|mut conn| self.repository.release(&mut conn, job));
        if let Err(err) = released {
            error!("failed to release job {}: {}", job, err);
        }
    }

    async fn refresh_prices(&self) -> Result<()> {
        let holdings = {
            let mut conn = self.connection()?;
            self.holding_repository.list_all(&mut conn)?
        };
        if holdings.is_empty() {
            info!("update_prices: nothing held, nothing to refresh");
            return Ok(());
        }

        // One fetch per distinct ticker; the stored price is the fallback
        // when the source fails.
        let mut fallbacks: BTreeMap<String, f64> = BTreeMap::new();
        for holding in &holdings {
            fallbacks
                .entry(holding.ticker.clone())
                .or_insert(holding.updated_price);
        }

        let fetches = fallbacks.iter().map(|(ticker, fallback)| async move {
            (
                ticker.clone(),
                self.market_data.price_or(ticker, *fallback).await,
            )
        });
        let prices: BTreeMap<String, f64> = join_all(fetches).await.into_iter().collect();

        let mut conn = self.connection()?;
        conn.immediate_transaction::<(), SchedulerError, _>(|conn| {
            for (ticker, price) in &prices {
                self.holding_repository
                    .set_price_for_ticker(conn, ticker, *price)?;
            }

            let valued_at = Utc::now().naive_utc();
            for portfolio in self.portfolio_repository.list_all(conn)? {
                let positions = self
                    .holding_repository
                    .list_for_portfolio(conn, &portfolio.id)?
                    .into_iter()
                    .map(|h| Ok((decimal(h.updated_price)?, h.shares)))
                    .collect::<Result<Vec<_>>>()?;

                let total = valuation::portfolio_total(decimal(portfolio.available_cash)?, positions);
                let total = to_f64(total)?;

                self.portfolio_repository
                    .set_valuation(conn, &portfolio.id, total, valued_at)?;
                self.portfolio_repository
                    .append_history(conn, &portfolio.id, total, valued_at)?;
            }
            Ok(())
        })?;

        info!("update_prices: refreshed {} tickers", prices.len());
        Ok(())
    }

    async fn refresh_opens(&self) -> Result<()> {
        let holdings = {
            let mut conn = self.connection()?;
            self.holding_repository.list_all(&mut conn)?
        };
        if holdings.is_empty() {
            info!("update_open: nothing held, nothing to refresh");
            return Ok(());
        }

        let mut fallbacks: BTreeMap<String, f64> = BTreeMap::new();
        for holding in &holdings {
            fallbacks
                .entry(holding.ticker.clone())
                .or_insert(holding.opening_price);
        }

        let fetches = fallbacks.iter().map(|(ticker, fallback)| async move {
            (
                ticker.clone(),
                self.market_data.open_or(ticker, *fallback).await,
            )
        });
        let opens: BTreeMap<String, f64> = join_all(fetches).await.into_iter().collect();

        let today = market_date_today();
        let mut conn = self.connection()?;
        let written = conn.immediate_transaction::<usize, SchedulerError, _>(|conn| {
            let mut written = 0;
            for (ticker, open) in &opens {
                written += self
                    .holding_repository
                    .set_opening_price_for_ticker(conn, ticker, *open, today)?;
            }
            Ok(written)
        })?;

        info!("update_open: stamped {} holdings for {}", written, today);
        Ok(())
    }

    fn snapshot_closes(&self) -> Result<()> {
        let mut conn = self.connection()?;
        conn.immediate_transaction::<(), SchedulerError, _>(|conn| {
            for portfolio in self.portfolio_repository.list_all(conn)? {
                self.portfolio_repository.snapshot_close(conn, &portfolio.id)?;
            }
            Ok(())
        })?;

        info!("update_close: close-of-day values frozen");
        Ok(())
    }

    fn connection(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| SchedulerError::DatabaseError(e.to_string()))
    }
}

/// Drives the schedule: a minute tick, gated to weekdays in the market
/// timezone. Opens are captured at 09:30, prices refresh every 30 minutes
/// during trading hours, closes freeze at 16:00.
pub struct JobScheduler {
    service: Arc<SchedulerService>,
}

impl JobScheduler {
    pub fn new(service: Arc<SchedulerService>) -> Self {
        Self { service }
    }

    pub async fn run_forever(&self) {
        let mut tick = tokio::time::interval(Duration::from_secs(60));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tick.tick().await;

            let now = market_now();
            if !is_weekday(now.date()) {
                continue;
            }

            let time = now.time();
            if time.hour() == 9 && time.minute() == 30 {
                log_outcome(JobId::UpdateOpen, self.service.update_open().await);
            }
            if is_market_hours(time) && time.minute() % 30 == 0 {
                log_outcome(JobId::UpdatePrices, self.service.update_prices().await);
            }
            if time.hour() == 16 && time.minute() == 0 {
                log_outcome(JobId::UpdateClose, self.service.update_close().await);
            }
        }
    }
}

fn log_outcome(job: JobId, result: Result<JobOutcome>) {
    match result {
        Ok(JobOutcome::Completed) => info!("job {} completed", job),
        Ok(JobOutcome::Skipped) => warn!("job {} skipped", job),
        Err(err) => error!("job {} failed: {}", job, err),
    }
}

fn decimal(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| {
        SchedulerError::DatabaseError(format!("stored amount {} is not representable", value))
    })
}

fn to_f64(value: Decimal) -> Result<f64> {
    value.to_f64().ok_or_else(|| {
        SchedulerError::DatabaseError(format!("computed amount {} is not representable", value))
    })
}
