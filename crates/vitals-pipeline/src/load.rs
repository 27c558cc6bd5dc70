//! Reading the three wide source files.

use std::{
  fs::File,
  io::{self, BufReader},
  path::Path,
};

use strum::IntoEnumIterator;
use vitals_core::table::Metric;
use vitals_csv::ParsedWide;

use crate::{Error, Result, config::InputPaths};

/// The three parsed wide tables of one build.
#[derive(Debug, Clone, Default)]
pub struct Sources {
  pub mortality:  ParsedWide,
  pub fertility:  ParsedWide,
  pub employment: ParsedWide,
}

impl Sources {
  /// Parse three in-memory tables; mostly useful in tests.
  pub fn from_tables(
    mortality: &str,
    fertility: &str,
    employment: &str,
  ) -> Result<Self> {
    let parse = |text: &str, metric: Metric| {
      vitals_csv::parse_wide(text.as_bytes()).map_err(|source| Error::Parse {
        path: format!("<{metric}>").into(),
        source,
      })
    };
    Ok(Self {
      mortality:  parse(mortality, Metric::ChildMortality)?,
      fertility:  parse(fertility, Metric::Fertility)?,
      employment: parse(employment, Metric::EmploymentRate)?,
    })
  }

  pub fn get(&self, metric: Metric) -> &ParsedWide {
    match metric {
      Metric::ChildMortality => &self.mortality,
      Metric::Fertility => &self.fertility,
      Metric::EmploymentRate => &self.employment,
    }
  }
}

/// Load all three sources. Every path is checked before any file is parsed,
/// so a missing input fails fast and names the metric it belongs to. A path
/// that exists but cannot be read is a [`Error::Read`] instead.
pub fn load_sources(paths: &InputPaths) -> Result<Sources> {
  for metric in Metric::iter() {
    let path = paths.for_metric(metric);
    if !path.exists() {
      return Err(Error::MissingInput {
        metric,
        path: path.clone(),
      });
    }
  }

  Ok(Sources {
    mortality:  load_one(Metric::ChildMortality, &paths.mortality)?,
    fertility:  load_one(Metric::Fertility, &paths.fertility)?,
    employment: load_one(Metric::EmploymentRate, &paths.employment)?,
  })
}

fn load_one(metric: Metric, path: &Path) -> Result<ParsedWide> {
  if path.is_dir() {
    return Err(Error::Read {
      path:   path.to_path_buf(),
      source: io::Error::from(io::ErrorKind::IsADirectory),
    });
  }
  let file = File::open(path).map_err(|source| Error::Read {
    path: path.to_path_buf(),
    source,
  })?;
  let parsed = vitals_csv::parse_wide(BufReader::new(file)).map_err(|source| {
    Error::Parse {
      path: path.to_path_buf(),
      source,
    }
  })?;

  for defect in &parsed.column_defects {
    tracing::warn!(
      %metric,
      path = %path.display(),
      column = %defect.label,
      "skipping column: {}", defect.issue
    );
  }
  for defect in &parsed.row_defects {
    tracing::warn!(
      %metric,
      path = %path.display(),
      line = ?defect.line,
      country = ?defect.country,
      "rejecting row: {}", defect.issue
    );
  }
  tracing::info!(
    %metric,
    path = %path.display(),
    rows = parsed.table.len(),
    years = parsed.table.years().len(),
    "loaded source table"
  );

  Ok(parsed)
}
