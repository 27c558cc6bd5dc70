//! CSV codec for vitals.
//!
//! Converts between delimited text and [`vitals_core`] types: wide source
//! tables in, the joined dataset out (and back in), plus country lookup
//! tables. Pure synchronous; no logging and no filesystem access.
//!
//! # Quick start
//!
//! ```no_run
//! use vitals_csv::parse_wide;
//!
//! let input = "country,1991,1992\nChad,210.5,205.1\n";
//! let parsed = parse_wide(input.as_bytes()).unwrap();
//! println!("{} rows, {} defects", parsed.table.len(), parsed.row_defects.len());
//! ```

pub mod error;
mod facts;
mod lookup;
mod value;
mod wide;

pub use error::{Error, Result};
pub use facts::{FACT_HEADERS, read_facts, write_facts};
pub use lookup::{LookupEntry, parse_lookup};
pub use value::{CellError, parse_cell};
use serde::Serialize;
use vitals_core::table::WideTable;

// ─── Public types ────────────────────────────────────────────────────────────

/// Why a source row was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowIssue {
  #[error("missing country field")]
  MissingCountry,

  #[error("expected {expected} fields, found {found}")]
  FieldCount { expected: usize, found: usize },

  #[error("bad cell for {label}: {value:?}")]
  BadCell { label: String, value: String },

  #[error("unreadable record: {message}")]
  Unreadable { message: String },
}

/// A source row that was dropped while the rest of the file was kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDefect {
  /// 1-based line number in the source file, when known.
  pub line:    Option<u64>,
  /// Country field of the row, if one was present.
  pub country: Option<String>,
  pub issue:   RowIssue,
}

/// Why a header column was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ColumnIssue {
  #[error("label is not an integer year")]
  NotAYear,
  #[error("year appears more than once")]
  DuplicateYear,
}

/// A header column that was skipped; its cells are ignored in every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefect {
  pub label: String,
  pub issue: ColumnIssue,
}

/// The result of parsing one wide source file.
///
/// `table` holds every well-formed row; everything that was dropped is listed
/// in the defect vectors.
#[derive(Debug, Clone, Default)]
pub struct ParsedWide {
  pub table:          WideTable,
  pub row_defects:    Vec<RowDefect>,
  pub column_defects: Vec<ColumnDefect>,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a wide `country,<year>,…` table from `reader`.
///
/// Malformed rows and non-year columns are reported, not fatal. Only a missing
/// header or an I/O failure aborts the parse.
pub fn parse_wide<R: std::io::Read>(reader: R) -> Result<ParsedWide> {
  wide::parse(reader)
}
