//! Service for recording, deleting, and importing transactions.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::RECENT_TRANSACTIONS_LIMIT;
use crate::errors::ValidationError;
use crate::holdings::HoldingRepositoryTrait;
use crate::transactions::csv_parser::parse_csv;
use crate::transactions::import::normalize_rows;
use crate::transactions::transactions_model::{
    ImportResult, NewTransaction, Transaction, TransactionType,
};
use crate::transactions::transactions_traits::{
    TransactionRepositoryTrait, TransactionServiceTrait,
};
use crate::Result;

pub struct TransactionService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
}

impl TransactionService {
    /// Creates a new TransactionService instance with injected dependencies
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
    ) -> Self {
        Self {
            transaction_repository,
            holding_repository,
        }
    }

    fn build_trade(
        portfolio_id: &str,
        ticker: &str,
        transaction_type: TransactionType,
        shares: Decimal,
        price: Decimal,
    ) -> Result<NewTransaction> {
        let new_transaction = NewTransaction {
            id: None,
            portfolio_id: portfolio_id.to_string(),
            ticker: ticker.trim().to_uppercase(),
            transaction_type,
            shares,
            price,
            created_at: None,
        };
        new_transaction.validate()?;
        Ok(new_transaction)
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>> {
        self.transaction_repository.get_transactions(portfolio_id)
    }

    fn get_recent_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>> {
        self.transaction_repository
            .get_recent_transactions(portfolio_id, RECENT_TRANSACTIONS_LIMIT)
    }

    async fn record_buy(
        &self,
        portfolio_id: &str,
        ticker: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<Transaction> {
        let new_transaction =
            Self::build_trade(portfolio_id, ticker, TransactionType::Buy, shares, price)?;
        let (transaction, _) = self
            .transaction_repository
            .record_transaction(new_transaction)
            .await?;
        Ok(transaction)
    }

    async fn record_sell(
        &self,
        portfolio_id: &str,
        ticker: &str,
        shares: Decimal,
        price: Decimal,
    ) -> Result<Transaction> {
        let new_transaction =
            Self::build_trade(portfolio_id, ticker, TransactionType::Sell, shares, price)?;

        // Reject before anything is written. The write job replays the log
        // and would also catch an oversell, but that surfaces as log
        // corruption; selling more than you hold is plain bad input.
        let available = self
            .holding_repository
            .get_holding(portfolio_id, &new_transaction.ticker)?
            .map(|h| h.shares)
            .unwrap_or(Decimal::ZERO);
        if available < shares {
            return Err(ValidationError::InsufficientShares {
                requested: shares,
                available,
            }
            .into());
        }

        let (transaction, _) = self
            .transaction_repository
            .record_transaction(new_transaction)
            .await?;
        Ok(transaction)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transaction_repository
            .delete_transaction(transaction_id)
            .await
    }

    /// Imports a broker CSV export. Partial-success: every valid row is
    /// recorded in one batch (with its historical date when the file carries
    /// one), every invalid row becomes an error message, and both counts go
    /// back to the caller.
    async fn import_transactions(
        &self,
        portfolio_id: &str,
        content: &[u8],
    ) -> Result<ImportResult> {
        let parsed = parse_csv(content)?;
        let (records, row_errors) = normalize_rows(&parsed);

        let new_transactions: Vec<NewTransaction> = records
            .into_iter()
            .map(|record| NewTransaction {
                id: None,
                portfolio_id: portfolio_id.to_string(),
                ticker: record.ticker,
                transaction_type: record.transaction_type,
                shares: record.shares,
                price: record.price,
                created_at: record.date.map(|d| {
                    Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap_or_default())
                }),
            })
            .collect();

        let imported = if new_transactions.is_empty() {
            0
        } else {
            self.transaction_repository
                .record_transactions(new_transactions)
                .await?
        };

        debug!(
            "Imported {} transactions into portfolio {} ({} rows rejected)",
            imported,
            portfolio_id,
            row_errors.len()
        );

        Ok(ImportResult {
            imported,
            errors: row_errors
                .into_iter()
                .map(|e| format!("Row {}: {}", e.line, e.message))
                .collect(),
        })
    }
}
