pub(crate) mod trading_errors;
pub(crate) mod trading_model;
pub(crate) mod trading_service;

pub use trading_errors::TradeError;
pub use trading_model::TradeRequest;
pub use trading_service::TradeService;

pub type Result<T> = std::result::Result<T, TradeError>;
