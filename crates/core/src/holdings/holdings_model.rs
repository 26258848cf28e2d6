//! Holding domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Materialized position for one (portfolio, ticker) pair.
///
/// Derived entirely from the transaction log by replay - a recomputable
/// cache, never a source of truth. Rows with zero shares are deleted rather
/// than stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub shares: Decimal,
    /// Cost basis per share of the open position.
    pub average_cost: Decimal,
    /// Aggregate cost basis: shares x average_cost.
    pub book_value: Decimal,
    #[serde(with = "crate::transactions::timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

/// The pure-calculation view of a position: what replay produces before the
/// storage layer gives it an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSnapshot {
    pub ticker: String,
    pub shares: Decimal,
    pub book_value: Decimal,
}

impl HoldingSnapshot {
    /// Cost basis per share. Callers only hold snapshots with positive
    /// shares; a zero-share snapshot is represented as `None` upstream.
    pub fn average_cost(&self) -> Decimal {
        if self.shares > Decimal::ZERO {
            self.book_value / self.shares
        } else {
            Decimal::ZERO
        }
    }
}

impl From<Holding> for HoldingSnapshot {
    fn from(holding: Holding) -> Self {
        Self {
            ticker: holding.ticker,
            shares: holding.shares,
            book_value: holding.book_value,
        }
    }
}

/// Book-value projection used by allocation charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookValueEntry {
    pub ticker: String,
    pub book_value: Decimal,
}
