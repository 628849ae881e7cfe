use std::sync::Arc;

use log::warn;

use crate::errors::Result;

use super::market_data_errors::MarketDataError;
use super::market_data_model::{HistoricalBar, HistoryPeriod, NewsArticle, StockQuote};
use super::market_data_provider::MarketDataProvider;
use super::providers::yahoo_provider::YahooProvider;

/// Front door to the price source. Wraps a provider and adds the degrade
/// policy the refresh jobs rely on: a failed fetch falls back to the
/// caller-supplied previous value instead of erroring.
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Service backed by the default Yahoo Finance provider.
    pub fn yahoo() -> Result<Self> {
        let provider = YahooProvider::new().map_err(crate::errors::Error::MarketData)?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub async fn get_quote(&self, symbol: &str) -> Result<StockQuote> {
        Ok(self.provider.get_quote(symbol).await?)
    }

    pub async fn get_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<HistoricalBar>> {
        Ok(self.provider.get_history(symbol, period).await?)
    }

    pub async fn get_news(&self, symbol: &str) -> Result<Vec<NewsArticle>> {
        Ok(self.provider.get_news(symbol).await?)
    }

    /// Current price for `symbol`, or `fallback` when the source fails.
    pub async fn price_or(&self, symbol: &str, fallback: f64) -> f64 {
        match self.provider.get_quote(symbol).await {
            Ok(quote) => quote.price,
            Err(err) => {
                Self::log_degrade(symbol, &err);
                fallback
            }
        }
    }

    /// Opening price for `symbol`, or `fallback` when the source fails or
    /// omits the open.
    pub async fn open_or(&self, symbol: &str, fallback: f64) -> f64 {
        match self.provider.get_quote(symbol).await {
            Ok(quote) => quote.open.unwrap_or(fallback),
            Err(err) => {
                Self::log_degrade(symbol, &err);
                fallback
            }
        }
    }

    fn log_degrade(symbol: &str, err: &MarketDataError) {
        warn!("price fetch for {} failed, keeping stored value: {}", symbol, err);
    }
}
