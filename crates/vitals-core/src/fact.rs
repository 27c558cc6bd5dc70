//! Fact rows, the joined, analysis-ready unit of the report.
//!
//! A [`FactRow`] only exists once all three metrics are known for a
//! `(country_code, year)` key, so the completeness rule is carried by the type
//! rather than checked downstream. A [`Dataset`] owns the full, sorted set of
//! rows and is never mutated after construction.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{
  Error, Result,
  country::{Continent, Iso3},
  table::{Metric, Year},
};

// ─── Employment buckets ──────────────────────────────────────────────────────

/// Coarse category of the female employment rate.
///
/// The four valid buckets are half-open and contiguous over `[3, 90]`; the
/// last one is closed at 90. Anything outside that interval, NaN included,
/// lands in [`EmploymentBucket::Invalid`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
)]
pub enum EmploymentBucket {
  #[serde(rename = "3-35")]
  #[strum(serialize = "3-35")]
  From3To35,
  #[serde(rename = "36-46")]
  #[strum(serialize = "36-46")]
  From36To46,
  #[serde(rename = "47-57")]
  #[strum(serialize = "47-57")]
  From47To57,
  #[serde(rename = "58-90")]
  #[strum(serialize = "58-90")]
  From58To90,
  #[serde(rename = "invalid")]
  #[strum(serialize = "invalid")]
  Invalid,
}

impl EmploymentBucket {
  pub fn from_rate(rate: f64) -> Self {
    match rate {
      r if (3.0..36.0).contains(&r) => Self::From3To35,
      r if (36.0..47.0).contains(&r) => Self::From36To46,
      r if (47.0..58.0).contains(&r) => Self::From47To57,
      r if (58.0..=90.0).contains(&r) => Self::From58To90,
      _ => Self::Invalid,
    }
  }

  pub fn is_valid(self) -> bool { self != Self::Invalid }
}

// ─── FactRow ─────────────────────────────────────────────────────────────────

/// One country-year with all three metrics present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
  pub country:         String,
  pub country_code:    Iso3,
  pub continent:       Continent,
  pub year:            Year,
  pub mortality:       f64,
  pub fertility:       f64,
  pub employment_rate: f64,
}

impl FactRow {
  pub fn metric(&self, metric: Metric) -> f64 {
    match metric {
      Metric::ChildMortality => self.mortality,
      Metric::Fertility => self.fertility,
      Metric::EmploymentRate => self.employment_rate,
    }
  }

  /// Child mortality as a fraction of live births rather than per 1000.
  pub fn mortality_fraction(&self) -> f64 { self.mortality / 1000.0 }

  pub fn employment_bucket(&self) -> EmploymentBucket {
    EmploymentBucket::from_rate(self.employment_rate)
  }

  /// The composite key that identifies this row within a dataset.
  pub fn key(&self) -> (&Iso3, Year) { (&self.country_code, self.year) }
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// The analysis-ready collection of fact rows.
///
/// Rows are sorted by `(country_code, year)` and each key occurs once. All
/// aggregates iterate in this order, which makes "first row wins" tie-breaks
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
  rows: Vec<FactRow>,
}

impl Dataset {
  /// Sort `rows` into key order and check key uniqueness.
  pub fn new(mut rows: Vec<FactRow>) -> Result<Self> {
    rows.sort_by(|a, b| a.key().cmp(&b.key()));
    if let Some(pair) = rows.windows(2).find(|w| w[0].key() == w[1].key()) {
      return Err(Error::DuplicateKey {
        code: pair[1].country_code.to_string(),
        year: pair[1].year,
      });
    }
    Ok(Self { rows })
  }

  pub fn rows(&self) -> &[FactRow] { &self.rows }

  pub fn iter(&self) -> std::slice::Iter<'_, FactRow> { self.rows.iter() }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// Number of distinct countries.
  pub fn country_count(&self) -> usize {
    let mut codes: Vec<&Iso3> = self.rows.iter().map(|r| &r.country_code).collect();
    codes.dedup();
    codes.len()
  }

  /// Smallest and largest year present, or `None` for an empty dataset.
  pub fn year_span(&self) -> Option<(Year, Year)> {
    let min = self.rows.iter().map(|r| r.year).min()?;
    let max = self.rows.iter().map(|r| r.year).max()?;
    Some((min, max))
  }
}

impl<'a> IntoIterator for &'a Dataset {
  type Item = &'a FactRow;
  type IntoIter = std::slice::Iter<'a, FactRow>;

  fn into_iter(self) -> Self::IntoIter { self.rows.iter() }
}
