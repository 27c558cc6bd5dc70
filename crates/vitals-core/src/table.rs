//! Wide and long table shapes.
//!
//! Source datasets arrive wide (one row per country, one column per year).
//! The pipeline melts them into long tables of `(country, year, value)`
//! records before anything is joined.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// A calendar year as it appears in a source column label.
pub type Year = i32;

// ─── Metric ──────────────────────────────────────────────────────────────────

/// One of the three tracked indicators.
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
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
  /// Deaths of children under five per 1000 live births.
  ChildMortality,
  /// Births per woman.
  Fertility,
  /// Share of women aged 15+ in employment, in percent.
  EmploymentRate,
}

impl Metric {
  /// Column header used for this metric in the exported dataset.
  pub fn column_header(self) -> &'static str {
    match self {
      Self::ChildMortality => "Child Mortality",
      Self::Fertility => "Fertility Rate",
      Self::EmploymentRate => "Employment Rate",
    }
  }
}

// ─── Year range ──────────────────────────────────────────────────────────────

/// Either bound may be omitted, e.g. when only `VITALS_YEARS__START` is set;
/// it then takes its default.
#[derive(Deserialize)]
#[serde(default)]
struct RawYearRange {
  start: Year,
  end:   Year,
}

impl Default for RawYearRange {
  fn default() -> Self {
    let years = YearRange::default();
    Self {
      start: years.start,
      end:   years.end,
    }
  }
}

/// Inclusive range of years retained in the final dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawYearRange")]
pub struct YearRange {
  start: Year,
  end:   Year,
}

impl YearRange {
  pub fn new(start: Year, end: Year) -> Result<Self> {
    if start > end {
      return Err(Error::InvalidYearRange { start, end });
    }
    Ok(Self { start, end })
  }

  pub fn start(&self) -> Year { self.start }

  pub fn end(&self) -> Year { self.end }

  pub fn contains(&self, year: Year) -> bool {
    (self.start..=self.end).contains(&year)
  }
}

impl Default for YearRange {
  fn default() -> Self {
    Self {
      start: 1991,
      end:   2019,
    }
  }
}

impl TryFrom<RawYearRange> for YearRange {
  type Error = Error;

  fn try_from(raw: RawYearRange) -> Result<Self> { Self::new(raw.start, raw.end) }
}

// ─── Wide table ──────────────────────────────────────────────────────────────

/// One source row: a country and one optional cell per year column.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
  pub country: String,
  pub values:  Vec<Option<f64>>,
}

/// A country × year table as read from a source file.
///
/// Every row is guaranteed to carry exactly one cell per year column and a
/// non-empty country name; year labels are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
  years: Vec<Year>,
  rows:  Vec<WideRow>,
}

impl WideTable {
  /// Create an empty table with the given year columns.
  pub fn new(years: Vec<Year>) -> Result<Self> {
    let mut seen = BTreeSet::new();
    for year in &years {
      if !seen.insert(*year) {
        return Err(Error::DuplicateYear(*year));
      }
    }
    Ok(Self {
      years,
      rows: Vec::new(),
    })
  }

  /// Append a row, checking its shape against the year columns.
  pub fn push_row(&mut self, row: WideRow) -> Result<()> {
    if row.country.trim().is_empty() {
      return Err(Error::EmptyCountry);
    }
    if row.values.len() != self.years.len() {
      return Err(Error::RaggedRow {
        country:  row.country,
        expected: self.years.len(),
        found:    row.values.len(),
      });
    }
    self.rows.push(row);
    Ok(())
  }

  pub fn years(&self) -> &[Year] { &self.years }

  pub fn rows(&self) -> &[WideRow] { &self.rows }

  /// Number of country rows.
  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

// ─── Long table ──────────────────────────────────────────────────────────────

/// One melted cell. `value` is `None` when the source cell was blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
  pub country: String,
  pub year:    Year,
  pub value:   Option<f64>,
}

/// The long form of a single metric's wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
  pub metric:  Metric,
  pub records: Vec<LongRecord>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn year_range_rejects_inverted_bounds() {
    assert!(matches!(
      YearRange::new(2020, 1990),
      Err(Error::InvalidYearRange { .. })
    ));
    let range = YearRange::new(1991, 1991).unwrap();
    assert!(range.contains(1991));
    assert!(!range.contains(1992));
  }

  #[test]
  fn year_range_deserialize_validates() {
    let bad: Result<YearRange, _> =
      serde_json::from_str(r#"{"start": 2000, "end": 1999}"#);
    assert!(bad.is_err());
    let good: YearRange =
      serde_json::from_str(r#"{"start": 1991, "end": 2019}"#).unwrap();
    assert_eq!(good, YearRange::default());
  }

  #[test]
  fn year_range_missing_bound_takes_default() {
    let start_only: YearRange = serde_json::from_str(r#"{"start": 2005}"#).unwrap();
    assert_eq!(start_only, YearRange::new(2005, 2019).unwrap());
    let end_only: YearRange = serde_json::from_str(r#"{"end": 2000}"#).unwrap();
    assert_eq!(end_only, YearRange::new(1991, 2000).unwrap());
  }

  #[test]
  fn wide_table_rejects_duplicate_years() {
    assert!(matches!(
      WideTable::new(vec![2000, 2001, 2000]),
      Err(Error::DuplicateYear(2000))
    ));
  }

  #[test]
  fn wide_table_checks_row_shape() {
    let mut table = WideTable::new(vec![2000, 2001]).unwrap();
    table
      .push_row(WideRow {
        country: "Chad".into(),
        values:  vec![Some(1.0), None],
      })
      .unwrap();

    let ragged = table.push_row(WideRow {
      country: "Mali".into(),
      values:  vec![Some(1.0)],
    });
    assert!(matches!(ragged, Err(Error::RaggedRow { found: 1, .. })));

    let unnamed = table.push_row(WideRow {
      country: "  ".into(),
      values:  vec![None, None],
    });
    assert!(matches!(unnamed, Err(Error::EmptyCountry)));

    assert_eq!(table.len(), 1);
  }

  #[test]
  fn metric_names() {
    assert_eq!(Metric::ChildMortality.to_string(), "child_mortality");
    assert_eq!(
      "employment_rate".parse::<Metric>().unwrap(),
      Metric::EmploymentRate
    );
    assert_eq!(Metric::Fertility.column_header(), "Fertility Rate");
  }
}
