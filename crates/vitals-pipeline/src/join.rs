//! Keying long tables by `(country_code, year)` and joining them.
//!
//! Each metric's long table is first keyed through the [`CountryIndex`]:
//! records for unresolved names and years outside the configured range are
//! dropped. A repeated key keeps the record written under the canonical name,
//! falling back to the first record seen in source order.
//! The keyed tables are then left-joined onto the mortality table and rows
//! missing any metric are filtered out.

use std::collections::{BTreeMap, btree_map::Entry};

use serde::Serialize;
use vitals_core::{
  country::{CountryKey, Iso3},
  fact::FactRow,
  table::{LongTable, Metric, Year, YearRange},
};

use crate::harmonize::CountryIndex;

pub type JoinKey = (Iso3, Year);

// ─── Keyed tables ────────────────────────────────────────────────────────────

/// One surviving long record, carrying the identity it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedValue {
  pub country:     CountryKey,
  /// The name as written in the source, trimmed.
  pub source_name: String,
  pub value:       Option<f64>,
}

impl KeyedValue {
  /// Whether the source already used the canonical name, i.e. the record
  /// did not reach its key through an alias.
  pub fn is_canonical(&self) -> bool { self.source_name == self.country.name }
}

/// What keying dropped from one long table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyingStats {
  /// Records whose country name did not resolve.
  pub unresolved:   usize,
  /// Records outside the configured year range.
  pub out_of_range: usize,
  /// Records whose key was already taken by an earlier record.
  pub duplicates:   usize,
}

/// A long table keyed by `(country_code, year)`.
#[derive(Debug, Clone)]
pub struct KeyedTable {
  pub metric: Metric,
  pub values: BTreeMap<JoinKey, KeyedValue>,
  pub stats:  KeyingStats,
}

/// Key `table` through `index`, keeping only years inside `years`.
///
/// When two records share a key, a record under the canonical name displaces
/// one that arrived through an alias; otherwise the first record seen wins.
pub fn key_records(
  table: &LongTable,
  index: &CountryIndex,
  years: YearRange,
) -> KeyedTable {
  let mut values = BTreeMap::new();
  let mut stats = KeyingStats::default();

  for record in &table.records {
    let Some(country) = index.get(&record.country) else {
      stats.unresolved += 1;
      continue;
    };
    if !years.contains(record.year) {
      stats.out_of_range += 1;
      continue;
    }

    let candidate = KeyedValue {
      country:     country.clone(),
      source_name: record.country.trim().to_string(),
      value:       record.value,
    };
    match values.entry((country.code.clone(), record.year)) {
      Entry::Vacant(slot) => {
        slot.insert(candidate);
      }
      Entry::Occupied(mut kept) => {
        stats.duplicates += 1;
        if candidate.is_canonical() && !kept.get().is_canonical() {
          tracing::warn!(
            metric = %table.metric,
            code = %country.code,
            year = record.year,
            kept = %candidate.source_name,
            dropped = %kept.get().source_name,
            "duplicate key; canonical name displaces alias"
          );
          kept.insert(candidate);
        } else {
          tracing::debug!(
            metric = %table.metric,
            code = %country.code,
            year = record.year,
            kept = %kept.get().source_name,
            dropped = %candidate.source_name,
            "duplicate key; keeping first record"
          );
        }
      }
    }
  }

  KeyedTable {
    metric: table.metric,
    values,
    stats,
  }
}

// ─── Join ────────────────────────────────────────────────────────────────────

/// A joined row whose metrics may still be missing.
#[derive(Debug, Clone, PartialEq)]
struct PartialRow {
  country:         CountryKey,
  year:            Year,
  mortality:       Option<f64>,
  fertility:       Option<f64>,
  employment_rate: Option<f64>,
}

impl PartialRow {
  fn set(&mut self, metric: Metric, value: Option<f64>) {
    match metric {
      Metric::ChildMortality => self.mortality = value,
      Metric::Fertility => self.fertility = value,
      Metric::EmploymentRate => self.employment_rate = value,
    }
  }

  /// The finished row, or `None` if any metric is missing.
  fn complete(self) -> Option<FactRow> {
    Some(FactRow {
      country:         self.country.name,
      country_code:    self.country.code,
      continent:       self.country.continent,
      year:            self.year,
      mortality:       self.mortality?,
      fertility:       self.fertility?,
      employment_rate: self.employment_rate?,
    })
  }
}

/// Seed the accumulating table from the left-hand metric.
fn seed(left: &KeyedTable) -> Vec<PartialRow> {
  left
    .values
    .iter()
    .map(|((_, year), kv)| {
      let mut row = PartialRow {
        country:         kv.country.clone(),
        year:            *year,
        mortality:       None,
        fertility:       None,
        employment_rate: None,
      };
      row.set(left.metric, kv.value);
      row
    })
    .collect()
}

/// Left-join `right` onto `acc`: every accumulated row is kept, and picks up
/// the right-hand value for its key when one exists.
fn left_join(acc: Vec<PartialRow>, right: &KeyedTable) -> Vec<PartialRow> {
  acc
    .into_iter()
    .map(|mut row| {
      let key = (row.country.code.clone(), row.year);
      let value = right.values.get(&key).and_then(|kv| kv.value);
      row.set(right.metric, value);
      row
    })
    .collect()
}

/// The result of joining the three metric tables.
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
  /// Complete rows in `(country_code, year)` order.
  pub rows:       Vec<FactRow>,
  /// Rows produced by the left joins before the completeness filter.
  pub joined:     usize,
  /// Rows removed by the completeness filter.
  pub incomplete: usize,
}

/// Left-join fertility and then employment onto mortality, then drop every
/// row that is missing any of the three metrics.
pub fn join(
  mortality: &KeyedTable,
  fertility: &KeyedTable,
  employment: &KeyedTable,
) -> JoinOutcome {
  let joined = left_join(left_join(seed(mortality), fertility), employment);
  let total = joined.len();
  let rows: Vec<FactRow> =
    joined.into_iter().filter_map(PartialRow::complete).collect();

  JoinOutcome {
    incomplete: total - rows.len(),
    joined: total,
    rows,
  }
}
