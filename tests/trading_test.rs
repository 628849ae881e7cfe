mod common;

use papertrade_core::holdings::HoldingsService;
use papertrade_core::portfolios::PortfolioService;
use papertrade_core::trading::{TradeError, TradeRequest, TradeService};
use papertrade_core::transactions::TradeSide;

fn request(portfolio_id: &str, side: TradeSide, shares: i64, price: f64) -> TradeRequest {
    TradeRequest {
        portfolio_id: portfolio_id.to_string(),
        side,
        ticker: "ACME".to_string(),
        shares,
        price,
        company_name: "Acme Corp".to_string(),
        currency: "USD".to_string(),
        sector: Some("Industrials".to_string()),
        industry: Some("Explosives".to_string()),
    }
}

#[test]
fn buy_opens_a_position_and_debits_cash() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "wile");

    let trades = TradeService::new(db.pool.clone());
    let entry = trades
        .execute_trade(request(&portfolio.id, TradeSide::Buy, 10, 100.0))
        .unwrap();

    assert_eq!(entry.shares, 10);
    assert_eq!(entry.total_value, 1000.0);

    let holding = HoldingsService::new(db.pool.clone())
        .get_holding(&portfolio.id, "ACME")
        .unwrap();
    assert_eq!(holding.shares, 10);
    assert_eq!(holding.average_price, 100.0);
    assert_eq!(holding.updated_price, 100.0);
    assert_eq!(holding.opening_price, 100.0);

    let cash = PortfolioService::new(db.pool.clone())
        .get_available_cash(&portfolio.id)
        .unwrap();
    assert_eq!(cash, 9000.0);
}

#[test]
fn repeat_buys_blend_the_average_cost() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "wile");

    let trades = TradeService::new(db.pool.clone());
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Buy, 10, 100.0))
        .unwrap();
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Buy, 10, 200.0))
        .unwrap();

    let holding = HoldingsService::new(db.pool.clone())
        .get_holding(&portfolio.id, "ACME")
        .unwrap();
    assert_eq!(holding.shares, 20);
    assert_eq!(holding.average_price, 150.0);
    assert_eq!(holding.updated_price, 200.0);

    let cash = PortfolioService::new(db.pool.clone())
        .get_available_cash(&portfolio.id)
        .unwrap();
    assert_eq!(cash, 7000.0);
}

#[test]
fn partial_sell_keeps_the_average() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "wile");

    let trades = TradeService::new(db.pool.clone());
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Buy, 10, 100.0))
        .unwrap();
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Sell, 4, 110.0))
        .unwrap();

    let holding = HoldingsService::new(db.pool.clone())
        .get_holding(&portfolio.id, "ACME")
        .unwrap();
    assert_eq!(holding.shares, 6);
    assert_eq!(holding.average_price, 100.0);

    // 10000 - 1000 + 440
    let cash = PortfolioService::new(db.pool.clone())
        .get_available_cash(&portfolio.id)
        .unwrap();
    assert_eq!(cash, 9440.0);
}

#[test]
fn full_sell_deletes_the_holding() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "wile");

    let trades = TradeService::new(db.pool.clone());
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Buy, 10, 100.0))
        .unwrap();
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Sell, 10, 120.0))
        .unwrap();

    let holdings = HoldingsService::new(db.pool.clone())
        .list_holdings(&portfolio.id)
        .unwrap();
    assert!(holdings.is_empty());

    let cash = PortfolioService::new(db.pool.clone())
        .get_available_cash(&portfolio.id)
        .unwrap();
    assert_eq!(cash, 10200.0);
}

#[test]
fn buy_beyond_available_cash_is_rejected_whole() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "wile");

    let trades = TradeService::new(db.pool.clone());
    let result = trades.execute_trade(request(&portfolio.id, TradeSide::Buy, 101, 100.0));
    assert!(matches!(result, Err(TradeError::InsufficientFunds { .. })));

    // Nothing applied: no holding, no ledger entry, cash untouched.
    let holdings = HoldingsService::new(db.pool.clone())
        .list_holdings(&portfolio.id)
        .unwrap();
    assert!(holdings.is_empty());

    let cash = PortfolioService::new(db.pool.clone())
        .get_available_cash(&portfolio.id)
        .unwrap();
    assert_eq!(cash, 10000.0);
}

#[test]
fn overselling_is_rejected() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "wile");

    let trades = TradeService::new(db.pool.clone());
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Buy, 5, 100.0))
        .unwrap();

    let result = trades.execute_trade(request(&portfolio.id, TradeSide::Sell, 6, 100.0));
    assert!(matches!(
        result,
        Err(TradeError::InsufficientShares {
            requested: 6,
            held: 5
        })
    ));

    let holding = HoldingsService::new(db.pool.clone())
        .get_holding(&portfolio.id, "ACME")
        .unwrap();
    assert_eq!(holding.shares, 5);
}

#[test]
fn selling_a_ticker_never_held_is_rejected() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "wile");

    let result = TradeService::new(db.pool.clone())
        .execute_trade(request(&portfolio.id, TradeSide::Sell, 1, 100.0));
    assert!(matches!(result, Err(TradeError::HoldingNotFound { .. })));
}

#[test]
fn unknown_portfolio_is_rejected() {
    let db = common::setup_db();

    let result = TradeService::new(db.pool.clone())
        .execute_trade(request("no-such-portfolio", TradeSide::Buy, 1, 100.0));
    assert!(matches!(result, Err(TradeError::PortfolioNotFound(_))));
}

#[test]
fn cash_rounds_to_cents_at_each_step() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "wile");

    let trades = TradeService::new(db.pool.clone());
    // 3 * 33.335 = 100.005, rounds half-even to 100.00
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Buy, 3, 33.335))
        .unwrap();

    let cash = PortfolioService::new(db.pool.clone())
        .get_available_cash(&portfolio.id)
        .unwrap();
    assert_eq!(cash, 9900.0);
}

#[test]
fn every_trade_lands_in_the_ledger() {
    let db = common::setup_db();
    let portfolio = common::create_player(&db.pool, "wile");

    let trades = TradeService::new(db.pool.clone());
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Buy, 10, 100.0))
        .unwrap();
    trades
        .execute_trade(request(&portfolio.id, TradeSide::Sell, 10, 105.0))
        .unwrap();

    let ledger = trades.trade_history(&portfolio.id).unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].side, TradeSide::Buy);
    assert_eq!(ledger[1].side, TradeSide::Sell);
    assert_eq!(ledger[1].total_value, 1050.0);
}
