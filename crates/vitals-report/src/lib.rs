//! Aggregates and the summary document for a vitals dataset.
//!
//! Nothing here mutates a [`Dataset`](vitals_core::fact::Dataset): every
//! aggregate is recomputed on demand from the sorted rows.

pub mod aggregate;
pub mod digest;
pub mod summary;

pub use aggregate::{
  ContinentExtremum, Direction, Group, GroupMean, Percentile,
  extremum_per_continent, global_extremum, grouped_mean, mean_by_continent,
  mean_by_continent_year, mean_by_employment_bucket, percentiles,
};
pub use digest::dataset_digest;
pub use summary::{MetricSummary, Summary};
