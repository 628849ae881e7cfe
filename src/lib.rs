pub mod db;

pub mod holdings;
pub mod portfolios;
pub mod ranking;
pub mod scheduler;
pub mod trading;
pub mod transactions;
pub mod users;

pub mod constants;
pub mod errors;
pub mod market_data;
pub mod schema;
pub mod utils;
pub mod valuation;

pub use errors::{Error, Result};
