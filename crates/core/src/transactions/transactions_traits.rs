use async_trait::async_trait;
use rust_decimal::Decimal;

use super::transactions_model::{ImportResult, NewTransaction, Transaction};
use crate::holdings::Holding;
use crate::Result;

/// Trait defining the contract for Transaction repository operations.
///
/// Reads are plain pool queries. Every write is a single serialized database
/// transaction that appends (or deletes) log rows *and* replaces the derived
/// holding rows, so the log and the holdings table can never drift apart.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    /// All transactions for a portfolio, ordered by `(created_at, seq)` ascending.
    fn get_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>>;
    /// One ticker's transactions, ordered by `(created_at, seq)` ascending.
    fn get_transactions_by_ticker(
        &self,
        portfolio_id: &str,
        ticker: &str,
    ) -> Result<Vec<Transaction>>;
    /// Newest first, bounded.
    fn get_recent_transactions(&self, portfolio_id: &str, limit: i64) -> Result<Vec<Transaction>>;

    /// Appends one transaction and replaces the affected holding, atomically.
    /// Returns the recorded transaction and the holding after replay (`None`
    /// when the position netted out).
    async fn record_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<(Transaction, Option<Holding>)>;

    /// Appends a batch and replays every affected ticker, atomically.
    /// Returns the number of transactions inserted.
    async fn record_transactions(&self, new_transactions: Vec<NewTransaction>) -> Result<usize>;

    /// Deletes one transaction and replaces the affected holding, atomically.
    /// Returns the deleted transaction.
    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    /// Rebuilds the stored holding for `(portfolio_id, ticker)` by full replay.
    async fn recalculate_holding(
        &self,
        portfolio_id: &str,
        ticker: &str,
    ) -> Result<Option<Holding>>;
}

/// Trait defining the contract for Transaction service operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>>;
    fn get_recent_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>>;
    async fn record_buy(
        &self,
        portfolio_id: &str,
        ticker: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<Transaction>;
    async fn record_sell(
        &self,
        portfolio_id: &str,
        ticker: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    async fn import_transactions(&self, portfolio_id: &str, content: &[u8])
        -> Result<ImportResult>;
}
