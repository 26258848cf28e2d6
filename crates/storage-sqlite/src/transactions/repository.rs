//! Repository for the transaction log.
//!
//! Reads are plain pool queries. Every mutation is one write job: append or
//! delete log rows, then replay and replace the affected holdings, all
//! inside the writer's immediate transaction. A failure anywhere - including
//! a consistency error out of the replay - rolls the whole job back, so the
//! log and the holdings table never disagree.

use async_trait::async_trait;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use stockbook_core::holdings::Holding;
use stockbook_core::transactions::{
    NewTransaction, Transaction, TransactionError, TransactionRepositoryTrait,
};
use stockbook_core::Result;

use super::model::TransactionRow;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::holdings::replace_holding;
use crate::schema::transactions;

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Next value of the insertion-sequence counter. Only called from write
/// jobs, so the max-plus-one read cannot race another insert.
fn next_seq(conn: &mut SqliteConnection) -> Result<i64> {
    let current: Option<i64> = transactions::table
        .select(max(transactions::seq))
        .first(conn)
        .map_err(StorageError::from)?;
    Ok(current.unwrap_or(0) + 1)
}

fn insert_row(conn: &mut SqliteConnection, new_transaction: &NewTransaction) -> Result<Transaction> {
    new_transaction.validate()?;
    let row = TransactionRow::from_new(new_transaction, next_seq(conn)?);
    let inserted: TransactionRow = diesel::insert_into(transactions::table)
        .values(&row)
        .get_result(conn)
        .map_err(StorageError::from)?;
    Transaction::try_from(inserted)
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;

        let row = transactions::table
            .find(transaction_id)
            .select(TransactionRow::as_select())
            .first::<TransactionRow>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| TransactionError::NotFound(transaction_id.to_string()))?;

        Transaction::try_from(row)
    }

    fn get_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = transactions::table
            .filter(transactions::portfolio_id.eq(portfolio_id))
            .select(TransactionRow::as_select())
            .order((transactions::created_at.asc(), transactions::seq.asc()))
            .load::<TransactionRow>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    fn get_transactions_by_ticker(
        &self,
        portfolio_id: &str,
        ticker: &str,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = transactions::table
            .filter(transactions::portfolio_id.eq(portfolio_id))
            .filter(transactions::ticker.eq(ticker))
            .select(TransactionRow::as_select())
            .order((transactions::created_at.asc(), transactions::seq.asc()))
            .load::<TransactionRow>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    fn get_recent_transactions(&self, portfolio_id: &str, limit: i64) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = transactions::table
            .filter(transactions::portfolio_id.eq(portfolio_id))
            .select(TransactionRow::as_select())
            .order((transactions::created_at.desc(), transactions::seq.desc()))
            .limit(limit)
            .load::<TransactionRow>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn record_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<(Transaction, Option<Holding>)> {
        self.writer
            .exec(move |conn| {
                let transaction = insert_row(conn, &new_transaction)?;
                let holding =
                    replace_holding(conn, &transaction.portfolio_id, &transaction.ticker)?;
                Ok((transaction, holding))
            })
            .await
    }

    async fn record_transactions(&self, new_transactions: Vec<NewTransaction>) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                let mut affected: Vec<(String, String)> = Vec::new();
                let mut count = 0usize;

                for new_transaction in &new_transactions {
                    let transaction = insert_row(conn, new_transaction)?;
                    let key = (transaction.portfolio_id, transaction.ticker);
                    if !affected.contains(&key) {
                        affected.push(key);
                    }
                    count += 1;
                }

                // One replay per affected ticker, after the whole batch is in,
                // so historical rows land in order before anything is derived.
                for (portfolio_id, ticker) in &affected {
                    replace_holding(conn, portfolio_id, ticker)?;
                }

                Ok(count)
            })
            .await
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let transaction_id = transaction_id.to_string();

        self.writer
            .exec(move |conn| {
                let row = transactions::table
                    .find(&transaction_id)
                    .select(TransactionRow::as_select())
                    .first::<TransactionRow>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| TransactionError::NotFound(transaction_id.clone()))?;

                diesel::delete(transactions::table.find(&transaction_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let transaction = Transaction::try_from(row)?;
                replace_holding(conn, &transaction.portfolio_id, &transaction.ticker)?;
                Ok(transaction)
            })
            .await
    }

    async fn recalculate_holding(
        &self,
        portfolio_id: &str,
        ticker: &str,
    ) -> Result<Option<Holding>> {
        let portfolio_id = portfolio_id.to_string();
        let ticker = ticker.to_string();

        self.writer
            .exec(move |conn| replace_holding(conn, &portfolio_id, &ticker))
            .await
    }
}
