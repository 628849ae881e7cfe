use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_FIELD;
use crate::market_data::StockQuote;
use crate::transactions::TradeSide;

use super::trading_errors::TradeError;

/// A fully priced order, ready for execution.
///
/// The price is pinned at request-build time; execution never re-quotes,
/// so what the caller saw is what the trade settles at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub portfolio_id: String,
    pub side: TradeSide,
    pub ticker: String,
    pub shares: i64,
    pub price: f64,
    pub company_name: String,
    pub currency: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

impl TradeRequest {
    /// Builds a request from a live quote, applying the documented
    /// fallbacks for the descriptive fields the source may omit.
    pub fn from_quote(
        portfolio_id: &str,
        side: TradeSide,
        shares: i64,
        quote: &StockQuote,
    ) -> Self {
        Self {
            portfolio_id: portfolio_id.to_string(),
            side,
            ticker: quote.symbol.clone(),
            shares,
            price: quote.price,
            company_name: quote.company_name_or_default(),
            currency: quote.currency_or_default(),
            sector: quote.sector.clone(),
            industry: quote.industry.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), TradeError> {
        if self.ticker.trim().is_empty() {
            return Err(TradeError::InvalidData("Ticker must not be empty".to_string()));
        }
        if self.shares <= 0 {
            return Err(TradeError::InvalidData(format!(
                "Share count must be positive, got {}",
                self.shares
            )));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(TradeError::InvalidData(format!(
                "Price must be a positive number, got {}",
                self.price
            )));
        }
        Ok(())
    }

    pub(crate) fn company_name_or_ticker(&self) -> String {
        if self.company_name.trim().is_empty() || self.company_name == UNKNOWN_FIELD {
            self.ticker.clone()
        } else {
            self.company_name.clone()
        }
    }
}
