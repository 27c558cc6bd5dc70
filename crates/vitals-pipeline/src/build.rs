//! End-to-end build: sources in, [`Dataset`] and diagnostics out.

use std::{fs::File, io::BufReader};

use vitals_core::{
  fact::Dataset,
  resolver::CountryResolver,
  table::{Metric, YearRange},
};
use vitals_resolve::TableResolver;

use crate::{
  Error, Result,
  config::BuildConfig,
  diagnostics::{BuildDiagnostics, SourceReport},
  harmonize::Harmonizer,
  join::{JoinOutcome, KeyedTable, join, key_records},
  load::{Sources, load_sources},
  reshape::reshape,
};

/// The finished dataset together with what was dropped on the way.
#[derive(Debug, Clone)]
pub struct BuildOutput {
  pub dataset:     Dataset,
  pub diagnostics: BuildDiagnostics,
}

/// Reshape, harmonize and join `sources` into a dataset.
pub fn build<R>(
  sources: &Sources,
  harmonizer: &Harmonizer,
  resolver: &R,
  years: YearRange,
) -> Result<BuildOutput>
where
  R: CountryResolver + ?Sized,
{
  let long = [
    reshape(&sources.mortality.table, Metric::ChildMortality),
    reshape(&sources.fertility.table, Metric::Fertility),
    reshape(&sources.employment.table, Metric::EmploymentRate),
  ];
  tracing::info!(
    records = long.iter().map(|t| t.records.len()).sum::<usize>(),
    "reshaped sources"
  );

  let names = long
    .iter()
    .flat_map(|t| t.records.iter().map(|r| r.country.as_str()));
  let index = harmonizer.index(resolver, names);
  let unresolved: Vec<String> =
    index.unresolved().into_iter().map(str::to_string).collect();
  tracing::info!(
    resolved = index.resolved_count(),
    unresolved = unresolved.len(),
    "harmonized country names"
  );

  let keyed: [KeyedTable; 3] =
    long.each_ref().map(|table| key_records(table, &index, years));
  let [mortality, fertility, employment] = &keyed;

  let JoinOutcome {
    rows,
    joined,
    incomplete,
  } = join(mortality, fertility, employment);
  tracing::info!(joined, incomplete, complete = rows.len(), "joined metrics");

  let dataset = Dataset::new(rows)?;

  let sources = long
    .iter()
    .zip(&keyed)
    .map(|(table, keyed)| {
      let parsed = sources.get(table.metric);
      SourceReport {
        metric:         table.metric,
        rows:           parsed.table.len(),
        year_columns:   parsed.table.years().len(),
        records:        table.records.len(),
        keyed:          keyed.values.len(),
        dropped:        keyed.stats,
        row_defects:    parsed.row_defects.clone(),
        column_defects: parsed.column_defects.clone(),
      }
    })
    .collect();

  let diagnostics = BuildDiagnostics {
    sources,
    unresolved_names: unresolved,
    joined_rows: joined,
    incomplete_rows: incomplete,
    dataset_rows: dataset.len(),
  };

  Ok(BuildOutput {
    dataset,
    diagnostics,
  })
}

/// The resolver described by `config`: the built-in table, overridden by the
/// optional lookup file, with fuzzy matching if a threshold is set.
pub fn resolver_for(config: &BuildConfig) -> Result<TableResolver> {
  let mut resolver = TableResolver::builtin()?;

  if let Some(path) = &config.lookup {
    let file = File::open(path).map_err(|source| Error::Read {
      path: path.clone(),
      source,
    })?;
    let entries =
      vitals_csv::parse_lookup(BufReader::new(file)).map_err(|source| {
        Error::Parse {
          path: path.clone(),
          source,
        }
      })?;
    tracing::info!(
      path = %path.display(),
      entries = entries.len(),
      "loaded country lookup overrides"
    );
    resolver = resolver.with_overrides(entries);
  }

  if let Some(min_score) = config.fuzzy_threshold {
    resolver = resolver.with_fuzzy_threshold(min_score);
  }

  Ok(resolver)
}

/// Run a full build from `config`.
pub fn run(config: &BuildConfig) -> Result<BuildOutput> {
  config.validate()?;
  let harmonizer = Harmonizer::new(config.alias_pairs())?;
  let resolver = resolver_for(config)?;
  let sources = load_sources(&config.inputs)?;
  build(&sources, &harmonizer, &resolver, config.years)
}
