//! Error types for the vitals-csv codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("input has no header row")]
  MissingHeader,

  #[error("invalid lookup entry on line {line}: {reason}")]
  InvalidLookupEntry { line: u64, reason: String },

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("core error: {0}")]
  Core(#[from] vitals_core::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
