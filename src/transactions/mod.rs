pub(crate) mod transactions_model;
pub(crate) mod transactions_repository;

pub use transactions_model::{NewTransaction, TradeSide, Transaction, TransactionDB};
pub use transactions_repository::TransactionRepository;
