//! Transactions module - the append-only buy/sell log and its import paths.

mod csv_parser;
mod import;
mod transactions_constants;
mod transactions_errors;
mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use csv_parser::{parse_csv, ParsedCsv, RowError};
pub use import::{normalize_rows, COLUMN_ALIASES};
pub use transactions_constants::*;
pub use transactions_errors::TransactionError;
pub use transactions_model::{
    ImportResult, NewTransaction, Transaction, TransactionImport, TransactionType,
};
pub(crate) use transactions_model::timestamp_format;
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
