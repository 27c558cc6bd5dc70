//! Error types for `vitals-core`.

use thiserror::Error;

use crate::table::Year;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid ISO3 code: {0:?}")]
  InvalidIso3(String),

  #[error("unknown continent: {0:?}")]
  UnknownContinent(String),

  #[error("invalid year range: {start}..={end}")]
  InvalidYearRange { start: Year, end: Year },

  #[error("year column {0} appears more than once")]
  DuplicateYear(Year),

  #[error("row for {country:?} has {found} cells, expected {expected}")]
  RaggedRow {
    country:  String,
    expected: usize,
    found:    usize,
  },

  #[error("row has an empty country field")]
  EmptyCountry,

  #[error("duplicate dataset key ({code}, {year})")]
  DuplicateKey { code: String, year: Year },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
