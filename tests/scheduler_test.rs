mod common;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use papertrade_core::db::{get_connection, DbPool};
use papertrade_core::holdings::HoldingsService;
use papertrade_core::market_data::{
    HistoricalBar, HistoryPeriod, MarketDataError, MarketDataProvider, MarketDataService,
    NewsArticle, StockQuote,
};
use papertrade_core::portfolios::PortfolioService;
use papertrade_core::scheduler::{JobId, JobOutcome, SchedulerRepository, SchedulerService};
use papertrade_core::trading::{TradeRequest, TradeService};
use papertrade_core::transactions::TradeSide;

/// Provider fed from a fixed price table; unknown symbols fail the way a
/// network error would.
struct TableProvider {
    prices: HashMap<String, f64>,
    opens: HashMap<String, f64>,
}

impl TableProvider {
    fn new(prices: &[(&str, f64)], opens: &[(&str, f64)]) -> Self {
        Self {
            prices: prices
                .iter()
                .map(|(t, p)| (t.to_string(), *p))
                .collect(),
            opens: opens.iter().map(|(t, p)| (t.to_string(), *p)).collect(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for TableProvider {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError> {
        let price = self
            .prices
            .get(symbol)
            .copied()
            .ok_or_else(|| MarketDataError::FetchFailed(symbol.to_string()))?;

        Ok(StockQuote {
            symbol: symbol.to_string(),
            price,
            open: self.opens.get(symbol).copied(),
            currency: Some("USD".to_string()),
            company_name: Some(format!("{} Inc", symbol)),
            sector: None,
            industry: None,
            company_summary: None,
            week52_high: None,
            week52_low: None,
        })
    }

    async fn get_history(
        &self,
        _symbol: &str,
        _period: HistoryPeriod,
    ) -> Result<Vec<HistoricalBar>, MarketDataError> {
        Ok(Vec::new())
    }

    async fn get_news(&self, _symbol: &str) -> Result<Vec<NewsArticle>, MarketDataError> {
        Ok(Vec::new())
    }
}

fn scheduler_with(
    pool: &Arc<DbPool>,
    prices: &[(&str, f64)],
    opens: &[(&str, f64)],
) -> SchedulerService {
    let market_data = Arc::new(MarketDataService::new(Arc::new(TableProvider::new(
        prices, opens,
    ))));
    SchedulerService::new(pool.clone(), market_data)
}

fn buy(pool: &Arc<DbPool>, portfolio_id: &str, ticker: &str, shares: i64, price: f64) {
    TradeService::new(pool.clone())
        .execute_trade(TradeRequest {
            portfolio_id: portfolio_id.to_string(),
            side: TradeSide::Buy,
            ticker: ticker.to_string(),
            shares,
            price,
            company_name: format!("{} Inc", ticker),
            currency: "USD".to_string(),
            sector: None,
            industry: None,
        })
        .expect("Failed to execute buy");
}

#[test]
fn price_refresh_revalues_and_snapshots_history() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "ada");
    buy(&db.pool, &portfolio.id, "ACME", 10, 100.0);

    let scheduler = scheduler_with(&db.pool, &[("ACME", 120.0)], &[]);
    let outcome = tokio_test::block_on(scheduler.update_prices()).unwrap();
    assert_eq!(outcome, JobOutcome::Completed);

    let holding = HoldingsService::new(db.pool.clone())
        .get_holding(&portfolio.id, "ACME")
        .unwrap();
    assert_eq!(holding.updated_price, 120.0);

    // 9000 cash + 10 * 120
    let portfolios = PortfolioService::new(db.pool.clone());
    let refreshed = portfolios.get_portfolio(&portfolio.id).unwrap();
    assert_eq!(refreshed.updated_value, 10200.0);

    // Inception snapshot plus the refresh snapshot.
    let history = portfolios.value_history(&portfolio.id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].portfolio_value, 10200.0);
}

#[test]
fn failed_ticker_keeps_its_stored_price_while_others_move() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "ada");
    buy(&db.pool, &portfolio.id, "GOOD", 5, 50.0);
    buy(&db.pool, &portfolio.id, "DARK", 5, 80.0);

    // DARK is missing from the table, so its fetch fails.
    let scheduler = scheduler_with(&db.pool, &[("GOOD", 60.0)], &[]);
    tokio_test::block_on(scheduler.update_prices()).unwrap();

    let holdings = HoldingsService::new(db.pool.clone());
    assert_eq!(
        holdings.get_holding(&portfolio.id, "GOOD").unwrap().updated_price,
        60.0
    );
    assert_eq!(
        holdings.get_holding(&portfolio.id, "DARK").unwrap().updated_price,
        80.0
    );

    // Valuation still ran over every portfolio with the blended prices:
    // 10000 - 250 - 400 cash, plus 5*60 + 5*80.
    let refreshed = PortfolioService::new(db.pool.clone())
        .get_portfolio(&portfolio.id)
        .unwrap();
    assert_eq!(refreshed.updated_value, 10050.0);
}

#[test]
fn open_refresh_is_a_noop_within_the_same_day() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "ada");
    buy(&db.pool, &portfolio.id, "ACME", 10, 100.0);

    let scheduler = scheduler_with(&db.pool, &[("ACME", 101.0)], &[("ACME", 99.0)]);
    tokio_test::block_on(scheduler.update_open()).unwrap();

    let holdings = HoldingsService::new(db.pool.clone());
    assert_eq!(
        holdings.get_holding(&portfolio.id, "ACME").unwrap().opening_price,
        99.0
    );

    // A second run the same day leaves the captured open alone.
    let scheduler = scheduler_with(&db.pool, &[("ACME", 101.0)], &[("ACME", 97.0)]);
    tokio_test::block_on(scheduler.update_open()).unwrap();
    assert_eq!(
        holdings.get_holding(&portfolio.id, "ACME").unwrap().opening_price,
        99.0
    );
}

#[test]
fn close_snapshot_copies_the_current_value() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "ada");
    buy(&db.pool, &portfolio.id, "ACME", 10, 100.0);

    let scheduler = scheduler_with(&db.pool, &[("ACME", 130.0)], &[]);
    tokio_test::block_on(scheduler.update_prices()).unwrap();
    tokio_test::block_on(scheduler.update_close()).unwrap();

    let refreshed = PortfolioService::new(db.pool.clone())
        .get_portfolio(&portfolio.id)
        .unwrap();
    assert_eq!(refreshed.updated_value, 10300.0);
    assert_eq!(refreshed.last_close_value, 10300.0);
}

#[test]
fn an_in_flight_job_makes_the_next_trigger_skip() {
    let db = common::setup_db();
    common::create_player(&db.pool, "ada");

    // Simulate a run already holding the job.
    let repository = SchedulerRepository::new();
    let mut conn = get_connection(&db.pool).unwrap();
    repository.ensure_job(&mut conn, JobId::UpdatePrices).unwrap();
    assert!(repository.try_acquire(&mut conn, JobId::UpdatePrices).unwrap());
    drop(conn);

    let scheduler = scheduler_with(&db.pool, &[], &[]);
    let outcome = tokio_test::block_on(scheduler.update_prices()).unwrap();
    assert_eq!(outcome, JobOutcome::Skipped);

    // Releasing lets the next trigger run again.
    let mut conn = get_connection(&db.pool).unwrap();
    repository.release(&mut conn, JobId::UpdatePrices).unwrap();
    let state = repository.get(&mut conn, JobId::UpdatePrices).unwrap().unwrap();
    assert!(!state.is_running);
    assert!(state.last_run_at.is_some());
    drop(conn);

    let outcome = tokio_test::block_on(scheduler.update_prices()).unwrap();
    assert_eq!(outcome, JobOutcome::Completed);
}
