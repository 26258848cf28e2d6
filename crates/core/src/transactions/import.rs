//! Normalization of parsed CSV rows onto canonical transaction fields.
//!
//! Broker exports disagree on header names, so recognized aliases are kept
//! in a declarative table and matched case-insensitively. Each row either
//! becomes a [`TransactionImport`] or a [`RowError`]; a bad row never takes
//! the batch down with it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::transactions::csv_parser::{ParsedCsv, RowError};
use crate::transactions::transactions_model::{TransactionImport, TransactionType};

/// Canonical field -> accepted header spellings, compared case-insensitively
/// after trimming.
pub const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    ("ticker", &["ticker", "symbol", "stock", "asset"]),
    ("shares", &["shares", "qty", "quantity", "units"]),
    (
        "price",
        &["price", "unit price", "cost", "cost per share", "purchase price"],
    ),
    (
        "transaction_type",
        &["transaction type", "type", "action", "side"],
    ),
    (
        "date",
        &["date", "transaction date", "trade date", "purchase date"],
    ),
];

struct ColumnMap {
    ticker: Option<usize>,
    shares: Option<usize>,
    price: Option<usize>,
    transaction_type: Option<usize>,
    date: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Self {
        let index_of = |field: &str| -> Option<usize> {
            let aliases = COLUMN_ALIASES
                .iter()
                .find(|(canonical, _)| *canonical == field)
                .map(|(_, aliases)| *aliases)
                .unwrap_or(&[]);
            headers.iter().position(|h| {
                let header = h.trim().to_lowercase();
                aliases.iter().any(|a| *a == header)
            })
        };

        Self {
            ticker: index_of("ticker"),
            shares: index_of("shares"),
            price: index_of("price"),
            transaction_type: index_of("transaction_type"),
            date: index_of("date"),
        }
    }
}

/// Maps every data row of a parsed CSV onto canonical transaction records.
///
/// Returns the normalized rows plus one error per rejected row. Rows with an
/// empty ticker, non-positive shares or price, or an unrecognized type are
/// rejected; a missing or unparsable date falls back to `None` (the caller
/// substitutes "now") rather than failing the row.
pub fn normalize_rows(parsed: &ParsedCsv) -> (Vec<TransactionImport>, Vec<RowError>) {
    let columns = ColumnMap::resolve(&parsed.headers);
    let mut records = Vec::new();
    let mut errors: Vec<RowError> = parsed.errors.clone();

    for (line, cells) in &parsed.rows {
        match normalize_row(&columns, *line, cells) {
            Ok(record) => records.push(record),
            Err(message) => errors.push(RowError {
                line: *line,
                message,
            }),
        }
    }

    errors.sort_by_key(|e| e.line);
    (records, errors)
}

fn cell<'a>(cells: &'a [String], idx: Option<usize>) -> &'a str {
    idx.and_then(|i| cells.get(i)).map(String::as_str).unwrap_or("")
}

fn normalize_row(
    columns: &ColumnMap,
    line: usize,
    cells: &[String],
) -> std::result::Result<TransactionImport, String> {
    let ticker = cell(cells, columns.ticker).trim().to_uppercase();
    if ticker.is_empty() {
        return Err("missing ticker".to_string());
    }

    let shares = parse_positive_decimal(cell(cells, columns.shares), "shares")?;
    let price = parse_positive_decimal(cell(cells, columns.price), "price")?;

    let type_cell = cell(cells, columns.transaction_type).trim();
    let transaction_type = if type_cell.is_empty() {
        TransactionType::Buy
    } else {
        TransactionType::from_str(type_cell)?
    };

    let date_cell = cell(cells, columns.date).trim();
    let date = NaiveDate::parse_from_str(date_cell, "%Y-%m-%d").ok();

    Ok(TransactionImport {
        line_number: line,
        ticker,
        transaction_type,
        shares,
        price,
        date,
    })
}

fn parse_positive_decimal(raw: &str, field: &str) -> std::result::Result<Decimal, String> {
    let cleaned = raw.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        return Err(format!("missing {}", field));
    }
    let value =
        Decimal::from_str(&cleaned).map_err(|_| format!("invalid {}: '{}'", field, raw))?;
    if value <= Decimal::ZERO {
        return Err(format!("{} must be positive, got {}", field, value));
    }
    Ok(value)
}
