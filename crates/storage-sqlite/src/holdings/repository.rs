//! Repository for holdings, plus the replay-and-replace primitive.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use stockbook_core::holdings::{replay_holding, Holding, HoldingRepositoryTrait};
use stockbook_core::transactions::Transaction;
use stockbook_core::Result;

use super::model::HoldingRow;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{holdings, transactions};
use crate::transactions::TransactionRow;

/// Rebuilds the holding for `(portfolio_id, ticker)` by replaying that
/// ticker's full log, then swaps the stored row for the result.
///
/// Must run inside a write job: the surrounding immediate transaction is
/// what makes the delete-old/insert-new swap invisible to readers, and what
/// rolls back the triggering mutation if the replay reports corruption.
pub fn replace_holding(
    conn: &mut SqliteConnection,
    portfolio_id: &str,
    ticker: &str,
) -> Result<Option<Holding>> {
    let rows = transactions::table
        .filter(transactions::portfolio_id.eq(portfolio_id))
        .filter(transactions::ticker.eq(ticker))
        .select(TransactionRow::as_select())
        .order((transactions::created_at.asc(), transactions::seq.asc()))
        .load::<TransactionRow>(conn)
        .map_err(StorageError::from)?;

    let history = rows
        .into_iter()
        .map(Transaction::try_from)
        .collect::<Result<Vec<_>>>()?;

    let snapshot = replay_holding(&history)?;

    diesel::delete(
        holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .filter(holdings::ticker.eq(ticker)),
    )
    .execute(conn)
    .map_err(StorageError::from)?;

    match snapshot {
        Some(snapshot) => {
            let row = HoldingRow::from_snapshot(portfolio_id, &snapshot);
            let inserted: HoldingRow = diesel::insert_into(holdings::table)
                .values(&row)
                .get_result(conn)
                .map_err(StorageError::from)?;
            Ok(Some(inserted.into()))
        }
        None => {
            debug!(
                "Replay of {}/{} netted out to zero shares; holding removed",
                portfolio_id, ticker
            );
            Ok(None)
        }
    }
}

/// Repository for reading and directly mutating holdings.
///
/// Direct mutation (`upsert`/`delete`) exists for the incremental reversal
/// path; the ledger mutations go through [`replace_holding`] instead.
pub struct HoldingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    fn get_holding(&self, portfolio_id: &str, ticker: &str) -> Result<Option<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let row = holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .filter(holdings::ticker.eq(ticker))
            .select(HoldingRow::as_select())
            .first::<HoldingRow>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(Holding::from))
    }

    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = holdings::table
            .filter(holdings::portfolio_id.eq(portfolio_id))
            .select(HoldingRow::as_select())
            .order(holdings::ticker.asc())
            .load::<HoldingRow>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(Holding::from).collect())
    }

    async fn upsert_holding(&self, holding: Holding) -> Result<Holding> {
        let row = HoldingRow::from_domain(&holding);

        self.writer
            .exec(move |conn| {
                let stored: HoldingRow = diesel::insert_into(holdings::table)
                    .values(&row)
                    .on_conflict((holdings::portfolio_id, holdings::ticker))
                    .do_update()
                    .set((
                        holdings::shares.eq(&row.shares),
                        holdings::average_cost.eq(&row.average_cost),
                        holdings::book_value.eq(&row.book_value),
                        holdings::updated_at.eq(&row.updated_at),
                    ))
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Holding::from(stored))
            })
            .await
    }

    async fn delete_holding(&self, portfolio_id: &str, ticker: &str) -> Result<()> {
        let portfolio_id = portfolio_id.to_string();
        let ticker = ticker.to_string();

        self.writer
            .exec(move |conn| {
                diesel::delete(
                    holdings::table
                        .filter(holdings::portfolio_id.eq(&portfolio_id))
                        .filter(holdings::ticker.eq(&ticker)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
