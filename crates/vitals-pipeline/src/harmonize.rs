//! Country name harmonization and resolution.
//!
//! Raw names are first canonicalized through a fixed alias table, then each
//! distinct canonical name is resolved exactly once. The resulting
//! [`CountryIndex`] is the only place the join looks up codes and continents.

use std::collections::{BTreeMap, BTreeSet};

use vitals_core::{
  country::{CountryKey, Resolution},
  resolver::CountryResolver,
};

use crate::{Error, Result};

/// Aliases applied to every build. Targets are the display names used in the
/// exported dataset.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
  ("UAE", "United Arab Emirates"),
  ("Channel Islands", "United Kingdom"),
  ("Congo, Dem. Rep.", "Democratic Republic of the Congo"),
  ("Congo, Rep.", "Republic of the Congo"),
  ("Hong Kong, China", "Hong Kong"),
  ("Kyrgyz Republic", "Kyrgyzstan"),
  ("Lao", "Laos"),
  ("Micronesia, Fed. Sts.", "Micronesia"),
  ("Slovak Republic", "Slovakia"),
  ("St. Lucia", "Saint Lucia"),
  ("St. Vincent and the Grenadines", "Saint Vincent and the Grenadines"),
];

// ─── Harmonizer ──────────────────────────────────────────────────────────────

/// Exact-match alias table.
///
/// No alias target is itself an alias key, which makes
/// [`Harmonizer::canonicalize_name`] idempotent.
#[derive(Debug, Clone)]
pub struct Harmonizer {
  aliases: BTreeMap<String, String>,
}

impl Default for Harmonizer {
  fn default() -> Self {
    Self {
      aliases: DEFAULT_ALIASES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    }
  }
}

impl Harmonizer {
  /// The default aliases with `extra` layered on top; an extra entry replaces
  /// a default with the same key.
  pub fn new<I>(extra: I) -> Result<Self>
  where
    I: IntoIterator<Item = (String, String)>,
  {
    let mut aliases = Self::default().aliases;
    aliases.extend(extra);
    Self::from_aliases(aliases)
  }

  /// A harmonizer with exactly `aliases`, trimmed and validated.
  pub fn from_aliases<I>(aliases: I) -> Result<Self>
  where
    I: IntoIterator<Item = (String, String)>,
  {
    let mut table = BTreeMap::new();
    for (alias, target) in aliases {
      let (alias, target) = (alias.trim(), target.trim());
      if alias.is_empty() || target.is_empty() {
        return Err(Error::EmptyAlias);
      }
      if alias != target {
        table.insert(alias.to_string(), target.to_string());
      }
    }

    if let Some((alias, target)) =
      table.iter().find(|(_, target)| table.contains_key(*target))
    {
      return Err(Error::ChainedAlias {
        alias:  alias.clone(),
        target: target.clone(),
      });
    }

    Ok(Self { aliases: table })
  }

  /// Trim `raw` and replace it with its alias target, if any.
  pub fn canonicalize_name<'a>(&'a self, raw: &'a str) -> &'a str {
    let trimmed = raw.trim();
    self
      .aliases
      .get(trimmed)
      .map(String::as_str)
      .unwrap_or(trimmed)
  }

  /// Canonicalize and resolve every distinct name in `names`.
  ///
  /// The resolver is consulted once per distinct canonical name. Each
  /// unresolved name is logged once.
  pub fn index<'n, R, I>(&self, resolver: &R, names: I) -> CountryIndex
  where
    R: CountryResolver + ?Sized,
    I: IntoIterator<Item = &'n str>,
  {
    let mut by_canonical: BTreeMap<String, Option<CountryKey>> = BTreeMap::new();
    let mut by_raw: BTreeMap<String, String> = BTreeMap::new();

    for raw in names {
      if by_raw.contains_key(raw) {
        continue;
      }
      let canonical = self.canonicalize_name(raw).to_string();
      if !by_canonical.contains_key(&canonical) {
        let key = match resolver.resolve(&canonical) {
          Resolution::Resolved { code, continent } => Some(CountryKey {
            name: canonical.clone(),
            code,
            continent,
          }),
          Resolution::Unresolved => {
            tracing::warn!(
              country = %canonical,
              "country name did not resolve; its records are rejected"
            );
            None
          }
        };
        by_canonical.insert(canonical.clone(), key);
      }
      by_raw.insert(raw.to_string(), canonical);
    }

    CountryIndex {
      by_raw,
      by_canonical,
    }
  }
}

// ─── CountryIndex ────────────────────────────────────────────────────────────

/// Resolved identity for every raw name seen in a build.
#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
  by_raw:       BTreeMap<String, String>,
  by_canonical: BTreeMap<String, Option<CountryKey>>,
}

impl CountryIndex {
  /// The resolved key for a raw source name, or `None` if the name was never
  /// indexed or did not resolve.
  pub fn get(&self, raw: &str) -> Option<&CountryKey> {
    let canonical = self.by_raw.get(raw)?;
    self.by_canonical.get(canonical)?.as_ref()
  }

  /// Canonical names that failed to resolve, sorted.
  pub fn unresolved(&self) -> BTreeSet<&str> {
    self
      .by_canonical
      .iter()
      .filter(|(_, key)| key.is_none())
      .map(|(name, _)| name.as_str())
      .collect()
  }

  /// Number of distinct canonical names that resolved.
  pub fn resolved_count(&self) -> usize {
    self.by_canonical.values().filter(|k| k.is_some()).count()
  }
}
