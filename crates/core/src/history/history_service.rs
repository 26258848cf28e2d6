//! Service exposing the portfolio valuation series.

use std::sync::Arc;

use crate::history::history_calculator::reconstruct_history;
use crate::history::history_model::HistoryPoint;
use crate::transactions::TransactionRepositoryTrait;
use crate::Result;

pub struct HistoryService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl HistoryService {
    pub fn new(transaction_repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        Self {
            transaction_repository,
        }
    }

    /// Daily valuation series for charting, reconstructed from the
    /// portfolio's full transaction log.
    pub fn build_history(&self, portfolio_id: &str) -> Result<Vec<HistoryPoint>> {
        let transactions = self.transaction_repository.get_transactions(portfolio_id)?;
        Ok(reconstruct_history(&transactions))
    }
}
