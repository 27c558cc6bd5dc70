//! [`TableResolver`], the lookup-table implementation of [`CountryResolver`].

use std::collections::HashMap;

use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use vitals_core::{
  country::{Continent, Iso3, Resolution},
  resolver::CountryResolver,
};
use vitals_csv::{LookupEntry, parse_lookup};

use crate::{Error, Result, normalize::match_key};

/// The built-in country table: `name,iso3,continent,aliases`.
const BUILTIN_TABLE: &str = include_str!("../data/countries.csv");

struct Target {
  code:      Iso3,
  continent: Continent,
}

/// Resolves names against a country table.
///
/// Lookup order:
/// 1. exact match of the normalized name against every entry's name, ISO3 code
///    and aliases;
/// 2. if a fuzzy threshold is set, the best-scoring key at or above it, ties
///    going to the key registered first.
///
/// Both steps depend only on the table and the queried name, so resolution is
/// deterministic for the lifetime of the resolver.
pub struct TableResolver {
  targets:   Vec<Target>,
  /// Normalized key → index into `targets`.
  index:     HashMap<String, usize>,
  /// Keys in registration order; drives the fuzzy scan.
  keys:      Vec<String>,
  min_score: Option<i64>,
  matcher:   SkimMatcherV2,
}

impl TableResolver {
  /// A resolver over the table compiled into this crate.
  pub fn builtin() -> Result<Self> {
    Self::from_entries(parse_lookup(BUILTIN_TABLE.as_bytes())?)
  }

  /// A resolver over `entries`. Earlier entries win when two of them share a
  /// match key.
  pub fn from_entries(entries: Vec<LookupEntry>) -> Result<Self> {
    if entries.is_empty() {
      return Err(Error::EmptyTable);
    }
    let mut resolver = Self {
      targets:   Vec::with_capacity(entries.len()),
      index:     HashMap::new(),
      keys:      Vec::new(),
      min_score: None,
      matcher:   SkimMatcherV2::default(),
    };
    for entry in entries {
      resolver.register(entry, false);
    }
    Ok(resolver)
  }

  /// Layer `entries` over the table. Their keys replace existing ones, so a
  /// user lookup file can re-point a built-in name.
  pub fn with_overrides(mut self, entries: Vec<LookupEntry>) -> Self {
    for entry in entries {
      self.register(entry, true);
    }
    self
  }

  /// Enable fuzzy fallback for names with no exact match.
  pub fn with_fuzzy_threshold(mut self, min_score: i64) -> Self {
    self.min_score = Some(min_score);
    self
  }

  /// Number of distinct match keys.
  pub fn key_count(&self) -> usize { self.index.len() }

  fn register(&mut self, entry: LookupEntry, replace: bool) {
    let target = self.targets.len();
    self.targets.push(Target {
      code:      entry.code.clone(),
      continent: entry.continent,
    });

    let names = std::iter::once(entry.name)
      .chain(std::iter::once(entry.code.to_string()))
      .chain(entry.aliases);
    for name in names {
      let key = match_key(&name);
      if key.is_empty() {
        continue;
      }
      if !self.index.contains_key(&key) {
        self.keys.push(key.clone());
        self.index.insert(key, target);
      } else if replace {
        self.index.insert(key, target);
      }
    }
  }

  fn fuzzy_lookup(&self, key: &str, min_score: i64) -> Option<usize> {
    let mut best: Option<(i64, &str)> = None;
    for candidate in &self.keys {
      let Some(score) = self.matcher.fuzzy_match(candidate, key) else {
        continue;
      };
      if score >= min_score && best.is_none_or(|(s, _)| score > s) {
        best = Some((score, candidate.as_str()));
      }
    }
    let (score, candidate) = best?;
    tracing::debug!(query = key, matched = candidate, score, "fuzzy country match");
    self.index.get(candidate).copied()
  }

  fn lookup(&self, name: &str) -> Option<&Target> {
    let key = match_key(name);
    if key.is_empty() {
      return None;
    }
    let target = match self.index.get(&key) {
      Some(&i) => Some(i),
      None => self.min_score.and_then(|min| self.fuzzy_lookup(&key, min)),
    };
    target.map(|i| &self.targets[i])
  }
}

impl CountryResolver for TableResolver {
  fn resolve(&self, name: &str) -> Resolution {
    match self.lookup(name) {
      Some(target) => Resolution::Resolved {
        code:      target.code.clone(),
        continent: target.continent,
      },
      None => Resolution::Unresolved,
    }
  }
}
