pub(crate) mod market_data_errors;
pub(crate) mod market_data_model;
pub(crate) mod market_data_provider;
pub(crate) mod market_data_service;
pub(crate) mod providers;

// Re-export the public interface
pub use market_data_errors::MarketDataError;
pub use market_data_model::{HistoricalBar, HistoryPeriod, NewsArticle, StockQuote};
pub use market_data_provider::MarketDataProvider;
pub use market_data_service::MarketDataService;
pub use providers::yahoo_provider::YahooProvider;
