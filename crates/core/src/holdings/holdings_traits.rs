use async_trait::async_trait;

use super::holdings_model::{BookValueEntry, Holding};
use crate::transactions::Transaction;
use crate::Result;

/// Trait defining the contract for Holding repository operations.
///
/// Reads come straight from the pool; writes are serialized through the
/// storage layer's single writer.
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    fn get_holding(&self, portfolio_id: &str, ticker: &str) -> Result<Option<Holding>>;
    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    async fn upsert_holding(&self, holding: Holding) -> Result<Holding>;
    async fn delete_holding(&self, portfolio_id: &str, ticker: &str) -> Result<()>;
}

/// Trait defining the contract for Holding service operations.
#[async_trait]
pub trait HoldingServiceTrait: Send + Sync {
    fn get_holding(&self, portfolio_id: &str, ticker: &str) -> Result<Option<Holding>>;
    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    fn get_book_values(&self, portfolio_id: &str) -> Result<Vec<BookValueEntry>>;
    /// Rebuilds the stored holding for one ticker by full replay.
    async fn recalculate(&self, portfolio_id: &str, ticker: &str) -> Result<Option<Holding>>;
    /// Applies the incremental reversal of one transaction to the stored
    /// holding. Alternate path to deletion-by-replay; see the calculator
    /// docs for its approximation.
    async fn reverse(&self, transaction: &Transaction) -> Result<Option<Holding>>;
}
