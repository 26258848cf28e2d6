//! Service for managing portfolios.

use async_trait::async_trait;
use std::sync::Arc;

use super::portfolios_model::{NewPortfolio, Portfolio};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::Result;

pub struct PortfolioService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl PortfolioService {
    pub fn new(portfolio_repository: Arc<dyn PortfolioRepositoryTrait>) -> Self {
        Self {
            portfolio_repository,
        }
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.portfolio_repository.get_portfolio(portfolio_id)
    }

    fn get_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.portfolio_repository.get_portfolios()
    }

    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;
        self.portfolio_repository.create_portfolio(new_portfolio).await
    }
}
