pub(crate) mod holdings_errors;
pub(crate) mod holdings_model;
pub(crate) mod holdings_repository;
pub(crate) mod holdings_service;

pub use holdings_errors::HoldingError;
pub use holdings_model::{BreakdownSlice, Holding, HoldingDB, HoldingWithMetrics, NewHolding};
pub use holdings_repository::HoldingRepository;
pub use holdings_service::HoldingsService;

pub type Result<T> = std::result::Result<T, HoldingError>;
