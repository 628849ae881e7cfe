use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for trade execution. Everything except
/// `DatabaseError` is a caller error: the trade is rejected and nothing
/// is applied.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Portfolio not found: {0}")]
    PortfolioNotFound(String),
    #[error("No holding of {ticker} in portfolio {portfolio_id}")]
    HoldingNotFound {
        portfolio_id: String,
        ticker: String,
    },
    #[error("Insufficient funds: trade costs {required:.2} but only {available:.2} is available")]
    InsufficientFunds { required: f64, available: f64 },
    #[error("Insufficient shares: tried to sell {requested} but only {held} held")]
    InsufficientShares { requested: i64, held: i64 },
    #[error("Invalid trade: {0}")]
    InvalidData(String),
}

impl From<DieselError> for TradeError {
    fn from(err: DieselError) -> Self {
        TradeError::DatabaseError(err.to_string())
    }
}

impl From<crate::holdings::HoldingError> for TradeError {
    fn from(err: crate::holdings::HoldingError) -> Self {
        match err {
            crate::holdings::HoldingError::NotFound(msg) => TradeError::DatabaseError(msg),
            other => TradeError::DatabaseError(other.to_string()),
        }
    }
}

impl From<crate::portfolios::PortfolioError> for TradeError {
    fn from(err: crate::portfolios::PortfolioError) -> Self {
        match err {
            crate::portfolios::PortfolioError::NotFound(msg) => {
                TradeError::PortfolioNotFound(msg)
            }
            other => TradeError::DatabaseError(other.to_string()),
        }
    }
}
