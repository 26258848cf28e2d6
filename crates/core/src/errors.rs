//! Core error types for the Stockbook application.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::transactions::TransactionError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio ledger.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger consistency violation: {0}")]
    Consistency(#[from] ConsistencyError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, r2d2, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Database transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Rejected user input. Surfaced verbatim to the caller; nothing was mutated.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Insufficient shares to sell: requested {requested}, holding {available}")]
    InsufficientShares {
        requested: Decimal,
        available: Decimal,
    },
}

/// The transaction log itself is inconsistent: replaying it reached a state
/// that no validated input sequence can produce. Distinct from
/// [`ValidationError`] - this is a data-integrity failure, not a user error.
#[derive(Error, Debug)]
pub enum ConsistencyError {
    #[error(
        "sell of {requested} {ticker} shares exceeds the {available} held at that point in the log"
    )]
    Oversold {
        ticker: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("sell of {ticker} folded against an empty position")]
    EmptyPositionSell { ticker: String },
}
