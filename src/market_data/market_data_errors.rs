use thiserror::Error;

/// Custom error type for market data operations
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Failed to fetch data: {0}")]
    FetchFailed(String),

    #[error("No data found for symbol {0}")]
    NoData(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl From<yahoo_finance_api::YahooError> for MarketDataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        MarketDataError::ProviderError(err.to_string())
    }
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        MarketDataError::FetchFailed(err.to_string())
    }
}
