//! Pure ledger arithmetic: replaying a ticker's transaction history into a
//! position, and algebraically reversing a single transaction's effect.
//!
//! Both functions are side-effect free; the storage layer decides when to
//! persist their results.

use log::warn;
use rust_decimal::Decimal;

use crate::errors::ConsistencyError;
use crate::holdings::holdings_model::HoldingSnapshot;
use crate::transactions::{Transaction, TransactionType};
use crate::Result;

/// Replays a ticker's full transaction history from an empty position.
///
/// `transactions` must contain only one ticker's transactions, ordered by
/// `(created_at, seq)` ascending - the order the stores return them in.
/// Folds buys into the position at cost and removes sells proportionally at
/// the running cost basis (not the sale price), so realized gains never leak
/// into book value.
///
/// Returns `None` when the history nets out to zero shares: a flat position
/// is deleted, never stored. A sell that exceeds the running position, or a
/// sell against an empty position, means the log itself is corrupt and
/// yields a [`ConsistencyError`].
pub fn replay_holding(transactions: &[Transaction]) -> Result<Option<HoldingSnapshot>> {
    let mut shares = Decimal::ZERO;
    let mut book_value = Decimal::ZERO;
    let mut ticker = String::new();

    for txn in transactions {
        if ticker.is_empty() {
            ticker = txn.ticker.clone();
        } else if ticker != txn.ticker {
            warn!(
                "Replay fed mixed tickers ({} and {}); skipping transaction {}",
                ticker, txn.ticker, txn.id
            );
            continue;
        }

        match txn.transaction_type {
            TransactionType::Buy => {
                shares += txn.shares;
                book_value += txn.notional();
            }
            TransactionType::Sell => {
                if shares == Decimal::ZERO {
                    return Err(ConsistencyError::EmptyPositionSell {
                        ticker: txn.ticker.clone(),
                    }
                    .into());
                }
                if txn.shares > shares {
                    return Err(ConsistencyError::Oversold {
                        ticker: txn.ticker.clone(),
                        requested: txn.shares,
                        available: shares,
                    }
                    .into());
                }
                let value_per_share = book_value / shares;
                shares -= txn.shares;
                book_value -= txn.shares * value_per_share;
            }
        }
    }

    if shares > Decimal::ZERO {
        Ok(Some(HoldingSnapshot {
            ticker,
            shares,
            book_value,
        }))
    } else {
        Ok(None)
    }
}

/// Undoes one transaction's effect on a position without replaying the log.
///
/// Reversing a sell assumes the value removed at sale time was
/// `shares x price` - exact only when no other trades for the ticker
/// intervened after the reversed transaction. The deletion path therefore
/// prefers a full replay; this remains the documented incremental
/// alternative for callers that need it.
pub fn reverse_transaction(
    current: Option<&HoldingSnapshot>,
    txn: &Transaction,
) -> Option<HoldingSnapshot> {
    match txn.transaction_type {
        TransactionType::Buy => match current {
            Some(holding) => {
                let shares = holding.shares - txn.shares;
                let book_value = holding.book_value - txn.notional();
                if shares > Decimal::ZERO {
                    Some(HoldingSnapshot {
                        ticker: holding.ticker.clone(),
                        shares,
                        book_value,
                    })
                } else {
                    None
                }
            }
            // Nothing left to take the buy out of; the position is already gone.
            None => None,
        },
        TransactionType::Sell => match current {
            Some(holding) => Some(HoldingSnapshot {
                ticker: holding.ticker.clone(),
                shares: holding.shares + txn.shares,
                book_value: holding.book_value + txn.notional(),
            }),
            // The sell closed the position; restore it at the transaction price.
            None => Some(HoldingSnapshot {
                ticker: txn.ticker.clone(),
                shares: txn.shares,
                book_value: txn.notional(),
            }),
        },
    }
}
