//! Application-wide constants.

/// Default page size for the recent-transactions listing.
pub const RECENT_TRANSACTIONS_LIMIT: i64 = 15;
