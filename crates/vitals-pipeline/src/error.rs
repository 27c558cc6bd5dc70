//! Error type for `vitals-pipeline`.

use std::path::PathBuf;

use thiserror::Error;
use vitals_core::table::Metric;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{metric} input file not found: {}", path.display())]
  MissingInput { metric: Metric, path: PathBuf },

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path:   PathBuf,
    #[source]
    source: vitals_csv::Error,
  },

  #[error("alias {alias:?} points at {target:?}, which is itself an alias")]
  ChainedAlias { alias: String, target: String },

  #[error("alias entries must be non-empty")]
  EmptyAlias,

  #[error("percentile {0} is outside 0..=100")]
  InvalidPercentile(f64),

  #[error("resolver error: {0}")]
  Resolver(#[from] vitals_resolve::Error),

  #[error("core error: {0}")]
  Core(#[from] vitals_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
