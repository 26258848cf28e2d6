//! Database row model for transactions.

use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use stockbook_core::transactions::{
    NewTransaction, Transaction, TransactionError, TransactionType,
};
use stockbook_core::Error;

use crate::util::{format_timestamp, parse_decimal_string_tolerant, parse_timestamp};

/// Database model for transactions. Decimals and timestamps are TEXT; see
/// the migration for the column rationale.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionRow {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub transaction_type: String,
    pub shares: String,
    pub price: String,
    pub created_at: String,
    pub seq: i64,
}

impl TransactionRow {
    /// Builds an insertable row from validated input. `seq` must come from
    /// the writer-locked counter.
    pub fn from_new(new_transaction: &NewTransaction, seq: i64) -> Self {
        Self {
            id: new_transaction
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            portfolio_id: new_transaction.portfolio_id.clone(),
            ticker: new_transaction.normalized_ticker(),
            transaction_type: new_transaction.transaction_type.as_str().to_string(),
            shares: new_transaction.shares.to_string(),
            price: new_transaction.price.to_string(),
            created_at: format_timestamp(&new_transaction.created_at.unwrap_or_else(Utc::now)),
            seq,
        }
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = Error;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        // The type column is a closed set we wrote ourselves; anything else
        // means the log was tampered with.
        let transaction_type = TransactionType::from_str(&row.transaction_type)
            .map_err(|e| TransactionError::InvalidData(format!("{} (row {})", e, row.id)))?;

        Ok(Transaction {
            transaction_type,
            shares: parse_decimal_string_tolerant(&row.shares, "shares"),
            price: parse_decimal_string_tolerant(&row.price, "price"),
            created_at: parse_timestamp(&row.created_at, "created_at"),
            id: row.id,
            portfolio_id: row.portfolio_id,
            ticker: row.ticker,
            seq: row.seq,
        })
    }
}
