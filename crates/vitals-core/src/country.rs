//! Country identity: ISO3 codes, continents and resolved keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{Error, Result};

// ─── ISO3 ────────────────────────────────────────────────────────────────────

/// An ISO 3166-1 alpha-3 code: exactly three ASCII uppercase letters.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Iso3(String);

impl Iso3 {
  /// Validate and wrap `code`. Lowercase input is accepted and uppercased.
  pub fn new(code: &str) -> Result<Self> {
    let code = code.trim();
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
      Ok(Self(code.to_ascii_uppercase()))
    } else {
      Err(Error::InvalidIso3(code.to_string()))
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Iso3 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl TryFrom<String> for Iso3 {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::new(&value) }
}

impl From<Iso3> for String {
  fn from(value: Iso3) -> Self { value.0 }
}

// ─── Continent ───────────────────────────────────────────────────────────────

/// Continent label attached to every resolved country.
///
/// The variant order is the order continents appear in every per-continent
/// aggregate.
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
)]
#[strum(ascii_case_insensitive)]
pub enum Continent {
  Africa,
  Asia,
  Europe,
  #[serde(rename = "North America")]
  #[strum(serialize = "North America")]
  NorthAmerica,
  #[serde(rename = "South America")]
  #[strum(serialize = "South America")]
  SouthAmerica,
  Oceania,
}

impl Continent {
  /// Parse a continent label, reporting unknown labels as a core error.
  pub fn parse(label: &str) -> Result<Self> {
    label
      .trim()
      .parse()
      .map_err(|_| Error::UnknownContinent(label.to_string()))
  }
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// The answer a [`crate::resolver::CountryResolver`] gives for one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Resolved { code: Iso3, continent: Continent },
  /// No match; callers reject records carrying this name.
  Unresolved,
}

/// A country's display name together with its resolved identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryKey {
  /// Canonicalized display name.
  pub name:      String,
  pub code:      Iso3,
  pub continent: Continent,
}
