//! Transaction domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::ValidationError;
use crate::transactions::transactions_constants::*;
use crate::Result;

/// The two sides of the ledger. Closed set; anything else in the log is
/// treated as corruption by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => TRANSACTION_TYPE_BUY,
            TransactionType::Sell => TRANSACTION_TYPE_SELL,
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    /// Case-insensitive: broker exports disagree on casing ("buy", "Buy", "BUY").
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            TRANSACTION_TYPE_BUY => Ok(TransactionType::Buy),
            TRANSACTION_TYPE_SELL => Ok(TransactionType::Sell),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// Domain model representing one buy or sell in a portfolio's log.
///
/// Immutable once recorded; the only later mutation is deletion, which
/// triggers a holding recalculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub portfolio_id: String,
    pub ticker: String,
    pub transaction_type: TransactionType,
    pub shares: Decimal,
    pub price: Decimal,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    /// Insertion sequence, assigned by the store under the writer lock.
    /// Total-order tiebreak for transactions sharing a timestamp.
    pub seq: i64,
}

impl Transaction {
    /// Cash value of the transaction (shares x unit price).
    pub fn notional(&self) -> Decimal {
        self.shares * self.price
    }

    /// Calendar day the transaction belongs to.
    pub fn effective_date(&self) -> NaiveDate {
        self.created_at.naive_utc().date()
    }
}

/// Input model for recording a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub portfolio_id: String,
    pub ticker: String,
    pub transaction_type: TransactionType,
    pub shares: Decimal,
    pub price: Decimal,
    /// Defaults to "now" at insertion; CSV import overrides it with the
    /// row's historical date.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewTransaction {
    /// Validates the new transaction data. Runs before any mutation.
    pub fn validate(&self) -> Result<()> {
        if self.portfolio_id.trim().is_empty() {
            return Err(ValidationError::MissingField("portfolioId".to_string()).into());
        }
        if self.ticker.trim().is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()).into());
        }
        if self.shares <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Shares must be positive, got {}",
                self.shares
            ))
            .into());
        }
        if self.price <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Price must be positive, got {}",
                self.price
            ))
            .into());
        }
        Ok(())
    }

    /// Trimmed, uppercased ticker. Applied at every entry point so the log
    /// never mixes "aapl" and "AAPL".
    pub fn normalized_ticker(&self) -> String {
        self.ticker.trim().to_uppercase()
    }
}

/// One CSV row, normalized onto the canonical transaction fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionImport {
    /// 1-based data-row number in the source file, for error reporting.
    pub line_number: usize,
    pub ticker: String,
    pub transaction_type: TransactionType,
    pub shares: Decimal,
    pub price: Decimal,
    pub date: Option<NaiveDate>,
}

/// Outcome of a bulk import: partial success, never all-or-nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Number of transactions actually recorded.
    pub imported: usize,
    /// One message per rejected row, in file order.
    pub errors: Vec<String>,
}

// Custom serialization for timestamps to ensure consistent ISO 8601 formatting
pub(crate) mod timestamp_format {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
            return Ok(dt.with_timezone(&Utc));
        }

        if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default()));
        }

        Err(serde::de::Error::custom(format!(
            "Invalid timestamp format: {}. Expected ISO 8601/RFC3339 or YYYY-MM-DD",
            s
        )))
    }
}
