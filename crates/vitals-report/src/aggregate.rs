//! Pure reducers over a [`Dataset`].
//!
//! Every function here walks the dataset in its `(country_code, year)` order
//! and uses strict comparisons, so ties always go to the first row in that
//! order.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::IntoEnumIterator;
use vitals_core::{
  country::Continent,
  fact::{Dataset, EmploymentBucket, FactRow},
  table::{Metric, Year},
};

// ─── Extrema ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
  Min,
  Max,
}

impl Direction {
  /// Whether `candidate` strictly beats `current`.
  fn beats(self, candidate: f64, current: f64) -> bool {
    match self {
      Self::Min => candidate < current,
      Self::Max => candidate > current,
    }
  }
}

/// The extreme row for one continent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinentExtremum {
  pub continent: Continent,
  pub row:       FactRow,
}

/// One row per continent present in `dataset`, ordered by continent.
pub fn extremum_per_continent(
  dataset: &Dataset,
  metric: Metric,
  direction: Direction,
) -> Vec<ContinentExtremum> {
  let mut best: BTreeMap<Continent, &FactRow> = BTreeMap::new();
  for row in dataset {
    let current = best.entry(row.continent).or_insert(row);
    if direction.beats(row.metric(metric), current.metric(metric)) {
      *current = row;
    }
  }

  best
    .into_iter()
    .map(|(continent, row)| ContinentExtremum {
      continent,
      row: row.clone(),
    })
    .collect()
}

/// The extreme row of the whole dataset, or `None` if it is empty.
pub fn global_extremum(
  dataset: &Dataset,
  metric: Metric,
  direction: Direction,
) -> Option<FactRow> {
  dataset
    .iter()
    .fold(None::<&FactRow>, |best, row| match best {
      Some(b) if !direction.beats(row.metric(metric), b.metric(metric)) => {
        Some(b)
      }
      _ => Some(row),
    })
    .cloned()
}

// ─── Grouped means ───────────────────────────────────────────────────────────

/// Mean of one group, or an explicit marker for a group with no rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupMean {
  Mean { mean: f64, count: usize },
  NoData,
}

impl GroupMean {
  pub fn mean(&self) -> Option<f64> {
    match self {
      Self::Mean { mean, .. } => Some(*mean),
      Self::NoData => None,
    }
  }

  pub fn count(&self) -> usize {
    match self {
      Self::Mean { count, .. } => *count,
      Self::NoData => 0,
    }
  }
}

/// A group key and its mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<K> {
  pub key:  K,
  #[serde(flatten)]
  pub mean: GroupMean,
}

/// Mean of `metric` per `key(row)`, ordered by key.
///
/// Every key in `expected` is listed even when no row maps to it, in which
/// case its mean is [`GroupMean::NoData`]. Keys seen in the data but absent
/// from `expected` are listed too.
pub fn grouped_mean<K, I, F>(
  dataset: &Dataset,
  metric: Metric,
  expected: I,
  key: F,
) -> Vec<Group<K>>
where
  K: Ord,
  I: IntoIterator<Item = K>,
  F: Fn(&FactRow) -> K,
{
  let mut sums: BTreeMap<K, (f64, usize)> =
    expected.into_iter().map(|k| (k, (0.0, 0))).collect();
  for row in dataset {
    let (sum, count) = sums.entry(key(row)).or_insert((0.0, 0));
    *sum += row.metric(metric);
    *count += 1;
  }

  sums
    .into_iter()
    .map(|(key, (sum, count))| Group {
      key,
      mean: match count {
        0 => GroupMean::NoData,
        n => GroupMean::Mean {
          mean:  sum / n as f64,
          count: n,
        },
      },
    })
    .collect()
}

/// Mean of `metric` for each of the five employment buckets, invalid included.
pub fn mean_by_employment_bucket(
  dataset: &Dataset,
  metric: Metric,
) -> Vec<Group<EmploymentBucket>> {
  grouped_mean(
    dataset,
    metric,
    EmploymentBucket::iter(),
    FactRow::employment_bucket,
  )
}

/// Mean of `metric` for every continent.
pub fn mean_by_continent(
  dataset: &Dataset,
  metric: Metric,
) -> Vec<Group<Continent>> {
  grouped_mean(dataset, metric, Continent::iter(), |r| r.continent)
}

/// Mean of `metric` per `(continent, year)` present in the dataset.
pub fn mean_by_continent_year(
  dataset: &Dataset,
  metric: Metric,
) -> Vec<Group<(Continent, Year)>> {
  grouped_mean(dataset, metric, [], |r| (r.continent, r.year))
}

// ─── Percentiles ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentile {
  /// Requested percentile, 0 to 100.
  pub p:     f64,
  /// `None` when the dataset is empty.
  pub value: Option<f64>,
}

/// Percentiles of `metric`, interpolating linearly between closest ranks.
pub fn percentiles(dataset: &Dataset, metric: Metric, ps: &[f64]) -> Vec<Percentile> {
  let mut values: Vec<f64> = dataset.iter().map(|r| r.metric(metric)).collect();
  values.sort_by(f64::total_cmp);

  ps.iter()
    .map(|&p| Percentile {
      p,
      value: interpolate(&values, p),
    })
    .collect()
}

fn interpolate(sorted: &[f64], p: f64) -> Option<f64> {
  let last = sorted.len().checked_sub(1)?;
  let rank = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
  let lo = rank.floor() as usize;
  let hi = rank.ceil() as usize;
  let frac = rank - lo as f64;
  Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
