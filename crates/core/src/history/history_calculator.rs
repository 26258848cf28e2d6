//! Reconstruction of the daily portfolio valuation series.
//!
//! Replays the full transaction log day by day. Positions are valued at the
//! most recent transaction price on or before each day - last trade as a
//! stand-in for market price, so the series needs no market-data dependency.

use chrono::{Duration, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::history::history_model::HistoryPoint;
use crate::transactions::{Transaction, TransactionType};

#[derive(Default)]
struct TickerPosition {
    shares: Decimal,
    value: Decimal,
}

/// Builds the dense daily valuation series for one portfolio's transactions.
///
/// `transactions` must be ordered by `(created_at, seq)` ascending - the
/// order the store returns them in. Produces one point per calendar day from
/// the first transaction to the last, carrying the prior value across days
/// without trades. Empty input produces an empty series.
pub fn reconstruct_history(transactions: &[Transaction]) -> Vec<HistoryPoint> {
    if transactions.is_empty() {
        return Vec::new();
    }

    // Group by calendar day; BTreeMap keeps the days in chronological order.
    let mut days: BTreeMap<NaiveDate, Vec<&Transaction>> = BTreeMap::new();
    for txn in transactions {
        days.entry(txn.effective_date()).or_default().push(txn);
    }

    let mut holdings: HashMap<String, TickerPosition> = HashMap::new();
    let mut total_value = Decimal::ZERO;
    let mut traded_days: Vec<HistoryPoint> = Vec::new();

    for (day, day_txns) in &days {
        for txn in day_txns {
            let position = holdings.entry(txn.ticker.clone()).or_default();
            let txn_value = txn.notional();

            match txn.transaction_type {
                TransactionType::Buy => {
                    position.shares += txn.shares;
                    position.value += txn_value;
                    total_value += txn_value;
                }
                TransactionType::Sell => {
                    // A sell from an empty position contributes nothing here;
                    // replay already flags it as corruption on the ledger side.
                    if position.shares > Decimal::ZERO {
                        let value_per_share = position.value / position.shares;
                        let value_removed = txn.shares * value_per_share;
                        position.shares -= txn.shares;
                        position.value -= value_removed;
                        total_value -= value_removed;

                        // Realized gain or loss joins the tracked total: a
                        // profitable sell grows it even as the position shrinks.
                        let profit_loss = txn_value - value_removed;
                        total_value += profit_loss;
                    }
                }
            }
        }

        let day_value = price_open_positions(&holdings, transactions, *day);
        debug!(
            "History day {}: tracked total {}, priced value {}",
            day, total_value, day_value
        );
        traded_days.push(HistoryPoint {
            date: *day,
            value: day_value,
        });
    }

    fill_calendar_days(traded_days)
}

/// Values every open position at the latest transaction price on or before
/// `day`, summing across tickers. A back-scan over the full list; fine for
/// bounded history lengths.
fn price_open_positions(
    holdings: &HashMap<String, TickerPosition>,
    transactions: &[Transaction],
    day: NaiveDate,
) -> Decimal {
    let mut day_value = Decimal::ZERO;

    for (ticker, position) in holdings {
        if position.shares <= Decimal::ZERO {
            continue;
        }
        let mut latest_price = None;
        for txn in transactions {
            if txn.ticker == *ticker && txn.effective_date() <= day {
                latest_price = Some(txn.price);
            }
        }
        if let Some(price) = latest_price {
            day_value += position.shares * price;
        }
    }

    day_value
}

/// Expands the traded-day points into a gap-free daily series, carrying the
/// most recent value across days without transactions.
fn fill_calendar_days(traded_days: Vec<HistoryPoint>) -> Vec<HistoryPoint> {
    let (first, last) = match (traded_days.first(), traded_days.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return traded_days,
    };

    let mut filled = Vec::new();
    let mut idx = 0;
    let mut current = first;

    while current <= last {
        if idx < traded_days.len() && traded_days[idx].date == current {
            filled.push(traded_days[idx].clone());
            idx += 1;
        } else {
            let value = filled
                .last()
                .map(|p: &HistoryPoint| p.value)
                .unwrap_or(Decimal::ZERO);
            filled.push(HistoryPoint {
                date: current,
                value,
            });
        }
        current += Duration::days(1);
    }

    filled
}
