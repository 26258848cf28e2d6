//! History module - daily portfolio valuation reconstructed from the log.

mod history_calculator;
mod history_model;
mod history_service;


pub use history_calculator::reconstruct_history;
pub use history_model::HistoryPoint;
pub use history_service::HistoryService;
