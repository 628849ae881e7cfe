use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::schema::transactions;
use crate::trading::TradeError;

use super::transactions_model::{NewTransaction, Transaction, TransactionDB};

/// Repository for the append-only trade ledger. There is deliberately no
/// update or delete here.
#[derive(Default)]
pub struct TransactionRepository;

impl TransactionRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn append(
        &self,
        conn: &mut SqliteConnection,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TradeError> {
        let transaction_db: TransactionDB = new_transaction.into();

        diesel::insert_into(transactions::table)
            .values(&transaction_db)
            .execute(conn)?;

        Ok(transaction_db.into())
    }

    pub fn list_for_portfolio(
        &self,
        conn: &mut SqliteConnection,
        portfolio_id: &str,
    ) -> Result<Vec<Transaction>, TradeError> {
        transactions::table
            .filter(transactions::portfolio_id.eq(portfolio_id))
            .order(transactions::executed_at.asc())
            .load::<TransactionDB>(conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(|e| TradeError::DatabaseError(e.to_string()))
    }
}
