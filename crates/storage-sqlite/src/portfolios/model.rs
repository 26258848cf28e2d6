//! Database row model for portfolios.

use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockbook_core::portfolios::{NewPortfolio, Portfolio};

use crate::util::{format_timestamp, parse_timestamp};

/// Database model for portfolios.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl PortfolioRow {
    pub fn from_new(new_portfolio: &NewPortfolio) -> Self {
        Self {
            id: new_portfolio
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_portfolio.name.trim().to_string(),
            created_at: format_timestamp(&Utc::now()),
        }
    }
}

impl From<PortfolioRow> for Portfolio {
    fn from(row: PortfolioRow) -> Self {
        Portfolio {
            created_at: parse_timestamp(&row.created_at, "created_at"),
            id: row.id,
            name: row.name,
        }
    }
}
