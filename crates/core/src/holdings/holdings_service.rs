//! Service for querying and rebuilding holdings.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use super::holdings_model::{BookValueEntry, Holding, HoldingSnapshot};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
use super::ledger_calculator::reverse_transaction;
use crate::transactions::{Transaction, TransactionRepositoryTrait};
use crate::Result;

pub struct HoldingsService {
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl HoldingsService {
    pub fn new(
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            holding_repository,
            transaction_repository,
        }
    }
}

#[async_trait]
impl HoldingServiceTrait for HoldingsService {
    fn get_holding(&self, portfolio_id: &str, ticker: &str) -> Result<Option<Holding>> {
        self.holding_repository.get_holding(portfolio_id, ticker)
    }

    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        self.holding_repository.get_holdings(portfolio_id)
    }

    fn get_book_values(&self, portfolio_id: &str) -> Result<Vec<BookValueEntry>> {
        let holdings = self.holding_repository.get_holdings(portfolio_id)?;
        Ok(holdings
            .into_iter()
            .map(|h| BookValueEntry {
                ticker: h.ticker,
                book_value: h.book_value,
            })
            .collect())
    }

    async fn recalculate(&self, portfolio_id: &str, ticker: &str) -> Result<Option<Holding>> {
        self.transaction_repository
            .recalculate_holding(portfolio_id, ticker)
            .await
    }

    async fn reverse(&self, transaction: &Transaction) -> Result<Option<Holding>> {
        let existing = self
            .holding_repository
            .get_holding(&transaction.portfolio_id, &transaction.ticker)?;
        let current: Option<HoldingSnapshot> = existing.clone().map(Into::into);

        match reverse_transaction(current.as_ref(), transaction) {
            Some(snapshot) => {
                let holding = Holding {
                    id: existing
                        .map(|h| h.id)
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    portfolio_id: transaction.portfolio_id.clone(),
                    ticker: snapshot.ticker.clone(),
                    shares: snapshot.shares,
                    average_cost: snapshot.average_cost(),
                    book_value: snapshot.book_value,
                    updated_at: Utc::now(),
                };
                self.holding_repository.upsert_holding(holding).await.map(Some)
            }
            None => {
                debug!(
                    "Reversal of transaction {} flattens {}; removing holding",
                    transaction.id, transaction.ticker
                );
                self.holding_repository
                    .delete_holding(&transaction.portfolio_id, &transaction.ticker)
                    .await?;
                Ok(None)
            }
        }
    }
}
