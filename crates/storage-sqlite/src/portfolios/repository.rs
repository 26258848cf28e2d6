//! Repository for portfolios.

use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use stockbook_core::portfolios::{NewPortfolio, Portfolio, PortfolioRepositoryTrait};
use stockbook_core::Result;

use super::model::PortfolioRow;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::portfolios;

pub struct PortfolioRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;

        let row = portfolios::table
            .find(portfolio_id)
            .select(PortfolioRow::as_select())
            .first::<PortfolioRow>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(row.into())
    }

    fn get_portfolios(&self) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = portfolios::table
            .select(PortfolioRow::as_select())
            .order(portfolios::created_at.asc())
            .load::<PortfolioRow>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(Portfolio::from).collect())
    }

    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        self.writer
            .exec(move |conn| {
                new_portfolio.validate()?;
                let row = PortfolioRow::from_new(&new_portfolio);
                let inserted: PortfolioRow = diesel::insert_into(portfolios::table)
                    .values(&row)
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Portfolio::from(inserted))
            })
            .await
    }
}
