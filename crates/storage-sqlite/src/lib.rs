//! SQLite storage implementation for Stockbook.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `stockbook-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for portfolios, transactions, and holdings
//! - Database-specific row types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. `core` is database-agnostic and works with traits.
//!
//! Every mutation goes through a single writer actor holding one connection;
//! each write job runs inside an immediate transaction. Appending or
//! deleting a transaction and replacing the derived holding therefore commit
//! or roll back together, and no reader can observe a holding mid-replace.

pub mod db;
pub mod errors;
pub mod schema;

mod util;

// Repository implementations
pub mod holdings;
pub mod portfolios;
pub mod transactions;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from stockbook-core for convenience
pub use stockbook_core::errors::{DatabaseError, Error, Result};
