//! Database row model for holdings.

use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockbook_core::holdings::{Holding, HoldingSnapshot};

use crate::util::{format_timestamp, parse_decimal_string_tolerant, parse_timestamp};

/// Database model for holdings.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingRow {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub shares: String,
    pub average_cost: String,
    pub book_value: String,
    pub updated_at: String,
}

impl HoldingRow {
    /// Materializes a replay result as a fresh row.
    pub fn from_snapshot(portfolio_id: &str, snapshot: &HoldingSnapshot) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.to_string(),
            ticker: snapshot.ticker.clone(),
            shares: snapshot.shares.to_string(),
            average_cost: snapshot.average_cost().to_string(),
            book_value: snapshot.book_value.to_string(),
            updated_at: format_timestamp(&Utc::now()),
        }
    }

    pub fn from_domain(holding: &Holding) -> Self {
        Self {
            id: holding.id.clone(),
            portfolio_id: holding.portfolio_id.clone(),
            ticker: holding.ticker.clone(),
            shares: holding.shares.to_string(),
            average_cost: holding.average_cost.to_string(),
            book_value: holding.book_value.to_string(),
            updated_at: format_timestamp(&holding.updated_at),
        }
    }
}

impl From<HoldingRow> for Holding {
    fn from(row: HoldingRow) -> Self {
        Holding {
            shares: parse_decimal_string_tolerant(&row.shares, "shares"),
            average_cost: parse_decimal_string_tolerant(&row.average_cost, "average_cost"),
            book_value: parse_decimal_string_tolerant(&row.book_value, "book_value"),
            updated_at: parse_timestamp(&row.updated_at, "updated_at"),
            id: row.id,
            portfolio_id: row.portfolio_id,
            ticker: row.ticker,
        }
    }
}
