pub(crate) mod portfolios_errors;
pub(crate) mod portfolios_model;
pub(crate) mod portfolios_repository;
pub(crate) mod portfolios_service;

pub use portfolios_errors::PortfolioError;
pub use portfolios_model::{
    HistoryEntry, HistoryEntryDB, NewPortfolio, PerformanceSeries, Portfolio, PortfolioDB,
    ValuePoint,
};
pub use portfolios_repository::PortfolioRepository;
pub use portfolios_service::PortfolioService;

pub type Result<T> = std::result::Result<T, PortfolioError>;
