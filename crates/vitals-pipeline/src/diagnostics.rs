//! What a build dropped, and why.

use serde::Serialize;
use vitals_core::table::Metric;
use vitals_csv::{ColumnDefect, RowDefect};

use crate::join::KeyingStats;

/// Per-source accounting, from parsed rows down to keyed records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
  pub metric:         Metric,
  /// Well-formed country rows in the wide table.
  pub rows:           usize,
  /// Year columns kept from the header.
  pub year_columns:   usize,
  /// Long records produced by the reshape.
  pub records:        usize,
  /// Records that survived keying.
  pub keyed:          usize,
  pub dropped:        KeyingStats,
  pub row_defects:    Vec<RowDefect>,
  pub column_defects: Vec<ColumnDefect>,
}

/// Build-wide diagnostics, serialised into the summary document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildDiagnostics {
  pub sources:          Vec<SourceReport>,
  /// Canonical names that did not resolve, sorted.
  pub unresolved_names: Vec<String>,
  /// Rows produced by the joins before the completeness filter.
  pub joined_rows:      usize,
  pub incomplete_rows:  usize,
  pub dataset_rows:     usize,
}

impl BuildDiagnostics {
  pub fn source(&self, metric: Metric) -> Option<&SourceReport> {
    self.sources.iter().find(|s| s.metric == metric)
  }

  /// Total rejected source rows across all inputs.
  pub fn row_defect_count(&self) -> usize {
    self.sources.iter().map(|s| s.row_defects.len()).sum()
  }
}
