//! Error type for `vitals-resolve`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("lookup table error: {0}")]
  Lookup(#[from] vitals_csv::Error),

  #[error("lookup table is empty")]
  EmptyTable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
