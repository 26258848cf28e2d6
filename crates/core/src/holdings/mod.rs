//! Holdings module - materialized positions and the ledger calculators.

mod holdings_model;
mod holdings_service;
mod holdings_traits;
mod ledger_calculator;

#[cfg(test)]
mod ledger_calculator_tests;

pub use holdings_model::{BookValueEntry, Holding, HoldingSnapshot};
pub use holdings_service::HoldingsService;
pub use holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
pub use ledger_calculator::{replay_holding, reverse_transaction};
