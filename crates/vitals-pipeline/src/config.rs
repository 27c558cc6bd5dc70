//! Build configuration, deserialised from `vitals.toml` and the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vitals_core::table::{Metric, YearRange};

use crate::{Error, Result};

/// Paths of the three wide source tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPaths {
  pub mortality:  PathBuf,
  pub fertility:  PathBuf,
  pub employment: PathBuf,
}

impl InputPaths {
  pub fn for_metric(&self, metric: Metric) -> &PathBuf {
    match metric {
      Metric::ChildMortality => &self.mortality,
      Metric::Fertility => &self.fertility,
      Metric::EmploymentRate => &self.employment,
    }
  }
}

impl Default for InputPaths {
  fn default() -> Self {
    Self {
      mortality:  "data/child_mortality_0_5_year_olds_dying_per_1000_born.csv"
        .into(),
      fertility:  "data/children_per_woman_total_fertility.csv".into(),
      employment: "data/females_aged_15plus_employment_rate_percent.csv".into(),
    }
  }
}

/// Where the build writes its artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
  pub dataset: PathBuf,
  pub summary: PathBuf,
}

impl Default for OutputPaths {
  fn default() -> Self {
    Self {
      dataset: "out/dataset.csv".into(),
      summary: "out/summary.json".into(),
    }
  }
}

/// One extra alias. Kept as a list of tables rather than a map so the raw
/// name survives config loaders that fold map keys to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
  pub from: String,
  pub to:   String,
}

/// Everything a report build needs. Every field has a default, so an empty
/// config file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  pub inputs:          InputPaths,
  pub output:          OutputPaths,
  pub years:           YearRange,
  /// Extra `raw name → canonical name` aliases layered over the defaults.
  pub aliases:         Vec<AliasEntry>,
  /// Optional `name,iso3,continent[,aliases]` file overriding the built-in
  /// country table.
  pub lookup:          Option<PathBuf>,
  /// Minimum fuzzy score for names with no exact match; `None` disables fuzzy
  /// matching.
  pub fuzzy_threshold: Option<i64>,
  /// Percentiles (0–100) reported for each metric.
  pub percentiles:     Vec<f64>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      inputs:          InputPaths::default(),
      output:          OutputPaths::default(),
      years:           YearRange::default(),
      aliases:         Vec::new(),
      lookup:          None,
      fuzzy_threshold: None,
      percentiles:     vec![10.0, 25.0, 50.0, 75.0, 90.0],
    }
  }
}

impl BuildConfig {
  /// The configured aliases as `(raw, canonical)` pairs, in file order.
  pub fn alias_pairs(&self) -> impl Iterator<Item = (String, String)> + '_ {
    self.aliases.iter().map(|a| (a.from.clone(), a.to.clone()))
  }

  /// Checks that serde cannot express. The year range validates itself on
  /// deserialisation.
  pub fn validate(&self) -> Result<()> {
    if let Some(p) = self
      .percentiles
      .iter()
      .find(|p| !(0.0..=100.0).contains(*p))
    {
      return Err(Error::InvalidPercentile(*p));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_gives_defaults() {
    let cfg: BuildConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, BuildConfig::default());
    assert_eq!(cfg.years.start(), 1991);
    assert_eq!(cfg.years.end(), 2019);
  }

  #[test]
  fn partial_sections_keep_other_defaults() {
    let cfg: BuildConfig = serde_json::from_str(
      r#"{"inputs": {"fertility": "f.csv"}, "years": {"start": 2000, "end": 2010}}"#,
    )
    .unwrap();
    assert_eq!(cfg.inputs.fertility, PathBuf::from("f.csv"));
    assert_eq!(cfg.inputs.mortality, InputPaths::default().mortality);
    assert_eq!(cfg.years, YearRange::new(2000, 2010).unwrap());
  }

  #[test]
  fn aliases_keep_their_case() {
    let cfg: BuildConfig = serde_json::from_str(
      r#"{"aliases": [{"from": "Tchad", "to": "Chad"}]}"#,
    )
    .unwrap();
    assert_eq!(cfg.alias_pairs().collect::<Vec<_>>(), vec![(
      "Tchad".to_string(),
      "Chad".to_string()
    )]);
  }

  #[test]
  fn percentiles_are_validated() {
    let mut cfg = BuildConfig::default();
    assert!(cfg.validate().is_ok());
    cfg.percentiles.push(101.0);
    assert!(matches!(cfg.validate(), Err(Error::InvalidPercentile(_))));
  }
}
