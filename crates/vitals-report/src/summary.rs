//! The summary document written next to the dataset.

use serde::Serialize;
use strum::IntoEnumIterator;
use vitals_core::{
  country::Continent,
  fact::{Dataset, EmploymentBucket, FactRow},
  table::{Metric, Year},
};
use vitals_pipeline::BuildDiagnostics;

use crate::{
  aggregate::{
    ContinentExtremum, Direction, Group, Percentile, extremum_per_continent,
    global_extremum, mean_by_continent, mean_by_continent_year,
    mean_by_employment_bucket, percentiles,
  },
  digest::dataset_digest,
};

/// Every aggregate for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
  pub metric:                    Metric,
  pub global_min:                Option<FactRow>,
  pub global_max:                Option<FactRow>,
  pub min_per_continent:         Vec<ContinentExtremum>,
  pub max_per_continent:         Vec<ContinentExtremum>,
  pub mean_by_continent:         Vec<Group<Continent>>,
  pub mean_by_employment_bucket: Vec<Group<EmploymentBucket>>,
  pub mean_by_continent_year:    Vec<Group<(Continent, Year)>>,
  pub percentiles:               Vec<Percentile>,
}

impl MetricSummary {
  pub fn compute(dataset: &Dataset, metric: Metric, ps: &[f64]) -> Self {
    Self {
      metric,
      global_min: global_extremum(dataset, metric, Direction::Min),
      global_max: global_extremum(dataset, metric, Direction::Max),
      min_per_continent: extremum_per_continent(dataset, metric, Direction::Min),
      max_per_continent: extremum_per_continent(dataset, metric, Direction::Max),
      mean_by_continent: mean_by_continent(dataset, metric),
      mean_by_employment_bucket: mean_by_employment_bucket(dataset, metric),
      mean_by_continent_year: mean_by_continent_year(dataset, metric),
      percentiles: percentiles(dataset, metric, ps),
    }
  }
}

/// Derived views of a dataset, plus how it was built when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
  /// Hex SHA-256 of the dataset rows.
  pub digest:                  String,
  pub rows:                    usize,
  pub countries:               usize,
  pub first_year:              Option<Year>,
  pub last_year:               Option<Year>,
  /// Rows whose employment rate falls outside every valid bucket.
  pub invalid_employment_rows: usize,
  pub metrics:                 Vec<MetricSummary>,
  /// Absent when the summary was recomputed from an exported dataset.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub diagnostics:             Option<BuildDiagnostics>,
}

impl Summary {
  pub fn compute(dataset: &Dataset, ps: &[f64]) -> Self {
    let span = dataset.year_span();
    let summary = Self {
      digest:                  dataset_digest(dataset),
      rows:                    dataset.len(),
      countries:               dataset.country_count(),
      first_year:              span.map(|(first, _)| first),
      last_year:               span.map(|(_, last)| last),
      invalid_employment_rows: dataset
        .iter()
        .filter(|r| !r.employment_bucket().is_valid())
        .count(),
      metrics:                 Metric::iter()
        .map(|metric| MetricSummary::compute(dataset, metric, ps))
        .collect(),
      diagnostics:             None,
    };
    tracing::info!(
      rows = summary.rows,
      countries = summary.countries,
      digest = %summary.digest,
      "computed summary"
    );
    summary
  }

  pub fn with_diagnostics(mut self, diagnostics: BuildDiagnostics) -> Self {
    self.diagnostics = Some(diagnostics);
    self
  }

  pub fn metric(&self, metric: Metric) -> Option<&MetricSummary> {
    self.metrics.iter().find(|m| m.metric == metric)
  }
}
