//! CSV parsing for broker transaction exports.
//!
//! Splits a raw byte stream into a header row and data rows, auto-detecting
//! the delimiter and tolerating a UTF-8 BOM. Malformed rows become per-row
//! errors; they never fail the whole file.

use csv::ReaderBuilder;

use crate::errors::ValidationError;
use crate::Result;

/// Error attached to a single data row.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based data-row number (the header row is not counted).
    pub line: usize,
    pub message: String,
}

/// Result of splitting a CSV file into headers and rows.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    /// Data rows paired with their 1-based row number.
    pub rows: Vec<(usize, Vec<String>)>,
    pub errors: Vec<RowError>,
}

/// Parses CSV content into headers and data rows.
///
/// The first non-empty record is the header row. Rows that the reader cannot
/// parse are reported in `errors` and skipped. An input with no records at
/// all is a validation error - there is nothing to import.
pub fn parse_csv(content: &[u8]) -> Result<ParsedCsv> {
    let text = decode_content(content);
    let delimiter = detect_delimiter(&text);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    let mut errors: Vec<RowError> = Vec::new();
    let mut line = 0usize;

    for result in reader.records() {
        match result {
            Ok(record) => {
                let cells: Vec<String> = record.iter().map(|s| s.trim().to_string()).collect();
                if cells.iter().all(|c| c.is_empty()) {
                    continue;
                }
                if headers.is_empty() {
                    headers = cells;
                } else {
                    line += 1;
                    rows.push((line, cells));
                }
            }
            Err(e) => {
                line += 1;
                errors.push(RowError {
                    line,
                    message: format!("Failed to parse row: {}", e),
                });
            }
        }
    }

    if headers.is_empty() {
        return Err(ValidationError::InvalidInput(
            "CSV file is empty or contains no valid records".to_string(),
        )
        .into());
    }

    Ok(ParsedCsv {
        headers,
        rows,
        errors,
    })
}

/// Decodes content bytes to a UTF-8 string, stripping a BOM if present.
/// Invalid sequences are replaced rather than failing the import.
fn decode_content(content: &[u8]) -> String {
    let without_bom = content.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(content);
    String::from_utf8_lossy(without_bom).into_owned()
}

/// Auto-detects the delimiter by scoring comma, semicolon, and tab against
/// the first few lines: occurrences weighted by cross-line consistency.
fn detect_delimiter(content: &str) -> u8 {
    let mut best = b',';
    let mut best_score = 0usize;

    for delim in [b',', b';', b'\t'] {
        let score = score_delimiter(content, delim as char);
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

fn score_delimiter(content: &str, delimiter: char) -> usize {
    let counts: Vec<usize> = content
        .lines()
        .take(10)
        .map(|l| l.matches(delimiter).count())
        .collect();

    match counts.first() {
        None | Some(0) => 0,
        Some(&first) => {
            let consistent = counts.iter().filter(|&&c| c == first).count();
            first * consistent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let content = b"Ticker,Shares,Price\nAAPL,10,150.25\nMSFT,5,300";
        let result = parse_csv(content).unwrap();

        assert_eq!(result.headers, vec!["Ticker", "Shares", "Price"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0], (1, vec!["AAPL".into(), "10".into(), "150.25".into()]));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_parse_semicolon_delimiter() {
        let content = b"Ticker;Shares;Price\nAAPL;10;150";
        let result = parse_csv(content).unwrap();

        assert_eq!(result.headers, vec!["Ticker", "Shares", "Price"]);
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_parse_tab_delimiter() {
        let content = b"Ticker\tShares\nAAPL\t10";
        let result = parse_csv(content).unwrap();

        assert_eq!(result.headers, vec!["Ticker", "Shares"]);
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let content = b"\xEF\xBB\xBFTicker,Shares\nAAPL,10";
        let result = parse_csv(content).unwrap();

        assert_eq!(result.headers[0], "Ticker");
    }

    #[test]
    fn test_skips_blank_rows() {
        let content = b"Ticker,Shares\nAAPL,10\n\nMSFT,5";
        let result = parse_csv(content).unwrap();

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[1].0, 2);
    }

    #[test]
    fn test_quoted_fields() {
        let content = b"Ticker,Note\nAAPL,\"hello, world\"";
        let result = parse_csv(content).unwrap();

        assert_eq!(result.rows[0].1[1], "hello, world");
    }

    #[test]
    fn test_empty_file_is_error() {
        assert!(parse_csv(b"").is_err());
    }
}
