use async_trait::async_trait;

use super::market_data_errors::MarketDataError;
use super::market_data_model::{HistoricalBar, HistoryPeriod, NewsArticle, StockQuote};

/// Contract for the external price source. Implementations are treated as
/// unreliable: any call may fail or return partial data, and callers are
/// expected to degrade rather than abort.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, MarketDataError>;

    async fn get_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<HistoricalBar>, MarketDataError>;

    async fn get_news(&self, symbol: &str) -> Result<Vec<NewsArticle>, MarketDataError>;
}
