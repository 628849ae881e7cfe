use std::sync::Arc;

use log::debug;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::db::{get_connection, DbPool};
use crate::holdings::{Holding, HoldingRepository, NewHolding};
use crate::portfolios::PortfolioRepository;
use crate::transactions::{NewTransaction, TradeSide, Transaction, TransactionRepository};
use crate::valuation::round_money;

use super::trading_errors::TradeError;
use super::trading_model::TradeRequest;

/// Executes buy and sell orders against a portfolio.
///
/// Every order runs inside one immediate (write) transaction, so concurrent
/// trades and scheduled refreshes serialize at the database and a rejected
/// order leaves no trace.
pub struct TradeService {
    pool: Arc<DbPool>,
    portfolio_repository: PortfolioRepository,
    holding_repository: HoldingRepository,
    transaction_repository: TransactionRepository,
}

impl TradeService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            portfolio_repository: PortfolioRepository::new(),
            holding_repository: HoldingRepository::new(),
            transaction_repository: TransactionRepository::new(),
        }
    }

    /// Executes a priced order and returns the appended ledger entry.
    pub fn execute_trade(&self, request: TradeRequest) -> Result<Transaction, TradeError> {
        request.validate()?;

        let mut conn =
            get_connection(&self.pool).map_err(|e| TradeError::DatabaseError(e.to_string()))?;

        conn.immediate_transaction::<Transaction, TradeError, _>(|conn| {
            let portfolio = self
                .portfolio_repository
                .get_by_id(conn, &request.portfolio_id)?;

            let total = round_money(
                decimal(request.price)? * Decimal::from(request.shares),
            );

            match request.side {
                TradeSide::Buy => self.apply_buy(conn, &request, portfolio.available_cash, total)?,
                TradeSide::Sell => self.apply_sell(conn, &request)?,
            }

            let cash = decimal(portfolio.available_cash)?;
            let new_cash = match request.side {
                TradeSide::Buy => round_money(cash - total),
                TradeSide::Sell => round_money(cash + total),
            };
            self.portfolio_repository
                .update_cash(conn, &request.portfolio_id, decimal_to_f64(new_cash)?)?;

            let entry = self.transaction_repository.append(
                conn,
                NewTransaction {
                    portfolio_id: request.portfolio_id.clone(),
                    side: request.side,
                    company_name: request.company_name_or_ticker(),
                    ticker: request.ticker.clone(),
                    currency: request.currency.clone(),
                    shares: request.shares,
                    price_per_share: request.price,
                    total_value: decimal_to_f64(total)?,
                },
            )?;

            debug!(
                "Executed {} {} x {} @ {} for portfolio {}",
                request.side, request.shares, request.ticker, request.price, request.portfolio_id
            );

            Ok(entry)
        })
    }

    /// The portfolio's full ledger, oldest trade first.
    pub fn trade_history(&self, portfolio_id: &str) -> Result<Vec<Transaction>, TradeError> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| TradeError::DatabaseError(e.to_string()))?;
        self.transaction_repository
            .list_for_portfolio(&mut conn, portfolio_id)
    }

    fn apply_buy(
        &self,
        conn: &mut diesel::SqliteConnection,
        request: &TradeRequest,
        available_cash: f64,
        total: Decimal,
    ) -> Result<(), TradeError> {
        if total > decimal(available_cash)? {
            return Err(TradeError::InsufficientFunds {
                required: decimal_to_f64(total)?,
                available: available_cash,
            });
        }

        match self
            .holding_repository
            .find(conn, &request.portfolio_id, &request.ticker)?
        {
            Some(holding) => {
                let new_average = weighted_average(&holding, request)?;
                self.holding_repository.apply_buy(
                    conn,
                    &holding.id,
                    holding.shares + request.shares,
                    new_average,
                    request.price,
                )?;
            }
            None => {
                self.holding_repository.insert(
                    conn,
                    NewHolding {
                        portfolio_id: request.portfolio_id.clone(),
                        company_name: request.company_name_or_ticker(),
                        ticker: request.ticker.clone(),
                        shares: request.shares,
                        price: request.price,
                        currency: request.currency.clone(),
                        sector: request.sector.clone(),
                        industry: request.industry.clone(),
                    },
                )?;
            }
        }

        Ok(())
    }

    fn apply_sell(
        &self,
        conn: &mut diesel::SqliteConnection,
        request: &TradeRequest,
    ) -> Result<(), TradeError> {
        let holding = self
            .holding_repository
            .find(conn, &request.portfolio_id, &request.ticker)?
            .ok_or_else(|| TradeError::HoldingNotFound {
                portfolio_id: request.portfolio_id.clone(),
                ticker: request.ticker.clone(),
            })?;

        if holding.shares < request.shares {
            return Err(TradeError::InsufficientShares {
                requested: request.shares,
                held: holding.shares,
            });
        }

        if holding.shares == request.shares {
            self.holding_repository.delete(conn, &holding.id)?;
        } else {
            self.holding_repository
                .apply_partial_sell(conn, &holding.id, holding.shares - request.shares)?;
        }

        Ok(())
    }
}

/// Weighted-average cost after buying into an existing position,
/// rounded to cents.
fn weighted_average(holding: &Holding, request: &TradeRequest) -> Result<f64, TradeError> {
    let held = Decimal::from(holding.shares);
    let bought = Decimal::from(request.shares);

    let blended = (decimal(holding.average_price)? * held + decimal(request.price)? * bought)
        / (held + bought);

    decimal_to_f64(round_money(blended))
}

fn decimal(value: f64) -> Result<Decimal, TradeError> {
    Decimal::from_f64(value)
        .ok_or_else(|| TradeError::InvalidData(format!("Amount {} is not representable", value)))
}

fn decimal_to_f64(value: Decimal) -> Result<f64, TradeError> {
    value
        .to_f64()
        .ok_or_else(|| TradeError::InvalidData(format!("Amount {} is not representable", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding_with(shares: i64, average_price: f64) -> Holding {
        Holding {
            id: "h1".to_string(),
            portfolio_id: "p1".to_string(),
            company_name: "Test Corp".to_string(),
            ticker: "TST".to_string(),
            shares,
            average_price,
            updated_price: average_price,
            opening_price: average_price,
            open_updated_on: None,
            currency: "USD".to_string(),
            sector: None,
            industry: None,
        }
    }

    fn buy_request(shares: i64, price: f64) -> TradeRequest {
        TradeRequest {
            portfolio_id: "p1".to_string(),
            side: TradeSide::Buy,
            ticker: "TST".to_string(),
            shares,
            price,
            company_name: "Test Corp".to_string(),
            currency: "USD".to_string(),
            sector: None,
            industry: None,
        }
    }

    #[test]
    fn weighted_average_blends_cost() {
        let avg = weighted_average(&holding_with(10, 100.0), &buy_request(10, 200.0)).unwrap();
        assert_eq!(avg, 150.0);
    }

    #[test]
    fn weighted_average_rounds_to_cents() {
        // (3 * 10.00 + 1 * 10.10) / 4 = 10.025 -> half-even to 10.02
        let avg = weighted_average(&holding_with(3, 10.0), &buy_request(1, 10.10)).unwrap();
        assert_eq!(avg, 10.02);
    }

    #[test]
    fn validate_rejects_non_positive_shares() {
        assert!(matches!(
            buy_request(0, 100.0).validate(),
            Err(TradeError::InvalidData(_))
        ));
    }

    #[test]
    fn validate_rejects_non_positive_price() {
        assert!(matches!(
            buy_request(1, 0.0).validate(),
            Err(TradeError::InvalidData(_))
        ));
        assert!(matches!(
            buy_request(1, f64::NAN).validate(),
            Err(TradeError::InvalidData(_))
        ));
    }
}
