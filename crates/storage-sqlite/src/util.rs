//! Helpers shared by the row models: timestamp and decimal round-tripping.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Timestamps are stored in this fixed-width UTC format so lexicographic
/// ordering of the column equals chronological ordering.
const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(SQL_TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp, tolerating RFC3339 and bare dates. A value
/// that parses as neither is logged and pinned to the epoch rather than
/// taking the whole row down.
pub(crate) fn parse_timestamp(value: &str, field_name: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default());
    }
    log::error!("Failed to parse {} '{}'. Falling back to epoch.", field_name, value);
    DateTime::<Utc>::UNIX_EPOCH
}

/// Parses a stored decimal, with a scientific-notation fallback. A value
/// that parses as neither is logged and read as zero.
pub(crate) fn parse_decimal_string_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e_decimal) => match Decimal::from_scientific(value_str) {
            Ok(d) => d,
            Err(e_scientific) => {
                log::error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as scientific (err: {}). Falling back to ZERO.",
                    field_name, value_str, e_decimal, e_scientific
                );
                Decimal::ZERO
            }
        },
    }
}
