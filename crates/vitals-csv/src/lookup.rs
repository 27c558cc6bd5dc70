//! Country lookup tables: `name,iso3,continent[,aliases]`.
//!
//! `aliases` is an optional `|`-separated list of alternative spellings.

use serde::Deserialize;
use vitals_core::country::{Continent, Iso3};

use crate::error::{Error, Result};

/// One row of a lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
  pub name:      String,
  pub code:      Iso3,
  pub continent: Continent,
  pub aliases:   Vec<String>,
}

#[derive(Deserialize)]
struct RawEntry {
  name:      String,
  iso3:      String,
  continent: String,
  #[serde(default)]
  aliases:   Option<String>,
}

impl RawEntry {
  fn validate(self, line: u64) -> Result<LookupEntry> {
    let invalid = |reason: String| Error::InvalidLookupEntry { line, reason };

    if self.name.is_empty() {
      return Err(invalid("empty name".to_string()));
    }
    let code = Iso3::new(&self.iso3).map_err(|e| invalid(e.to_string()))?;
    let continent =
      Continent::parse(&self.continent).map_err(|e| invalid(e.to_string()))?;
    let aliases = self
      .aliases
      .unwrap_or_default()
      .split('|')
      .map(str::trim)
      .filter(|a| !a.is_empty())
      .map(str::to_string)
      .collect();

    Ok(LookupEntry {
      name: self.name,
      code,
      continent,
      aliases,
    })
  }
}

/// Parse a lookup table. Any invalid entry fails the whole table, since a
/// half-loaded lookup would silently change which names resolve.
pub fn parse_lookup<R: std::io::Read>(reader: R) -> Result<Vec<LookupEntry>> {
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(reader);

  let mut entries = Vec::new();
  let mut record = csv::StringRecord::new();
  while reader.read_record(&mut record)? {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    let raw: RawEntry = record.deserialize(Some(reader.headers()?))?;
    entries.push(raw.validate(line)?);
  }
  Ok(entries)
}
