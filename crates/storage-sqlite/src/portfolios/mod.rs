//! Portfolio storage: row model and repository.

mod model;
mod repository;

pub use model::PortfolioRow;
pub use repository::PortfolioRepository;
