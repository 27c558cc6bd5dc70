//! Whole-pipeline scenarios over in-memory sources and the built-in resolver.

use std::path::PathBuf;

use vitals_core::{country::Continent, table::Metric, table::YearRange};
use vitals_csv::RowIssue;
use vitals_resolve::TableResolver;

use crate::{
  BuildConfig, BuildOutput, Error, Harmonizer, Sources, build,
  config::{AliasEntry, InputPaths},
  run,
};

fn resolver() -> TableResolver { TableResolver::builtin().expect("builtin table") }

fn build_from(mortality: &str, fertility: &str, employment: &str) -> BuildOutput {
  let sources = Sources::from_tables(mortality, fertility, employment).unwrap();
  build(
    &sources,
    &Harmonizer::default(),
    &resolver(),
    YearRange::default(),
  )
  .unwrap()
}

// ─── Completeness ────────────────────────────────────────────────────────────

#[test]
fn only_complete_rows_survive() {
  let out = build_from(
    "country,2000,2001\nChad,180,175\nPeru,20,19\n",
    "country,2000,2001\nChad,7.0,6.9\nPeru,2.6,2.5\n",
    "country,2000,2001\nChad,60,\nPeru,55,56\n",
  );

  let keys: Vec<_> = out
    .dataset
    .iter()
    .map(|r| (r.country_code.as_str(), r.year))
    .collect();
  assert_eq!(keys, vec![("PER", 2000), ("PER", 2001), ("TCD", 2000)]);

  assert_eq!(out.diagnostics.joined_rows, 4);
  assert_eq!(out.diagnostics.incomplete_rows, 1);
  assert_eq!(out.diagnostics.dataset_rows, 3);

  let chad = out.dataset.iter().find(|r| r.country == "Chad").unwrap();
  assert_eq!(chad.continent, Continent::Africa);
  assert_eq!(
    (chad.mortality, chad.fertility, chad.employment_rate),
    (180.0, 7.0, 60.0)
  );
}

#[test]
fn mortality_is_the_left_table() {
  // Japan has fertility and employment but no mortality row at all.
  let out = build_from(
    "country,2000\nChad,180\n",
    "country,2000\nChad,7\nJapan,1.4\n",
    "country,2000\nChad,60\nJapan,48\n",
  );
  assert_eq!(out.dataset.len(), 1);
  assert_eq!(out.diagnostics.joined_rows, 1);
}

// ─── Harmonization ───────────────────────────────────────────────────────────

#[test]
fn uae_resolves_to_are_in_asia() {
  let out = build_from(
    "country,2010\nUAE,8.1\n",
    "country,2010\nUAE,1.8\n",
    "country,2010\nUAE,43\n",
  );
  let row = &out.dataset.rows()[0];
  assert_eq!(row.country, "United Arab Emirates");
  assert_eq!(row.country_code.as_str(), "ARE");
  assert_eq!(row.continent, Continent::Asia);
}

#[test]
fn canonical_row_wins_over_aliased_duplicate() {
  // Alphabetical source order puts the alias first.
  let out = build_from(
    "country,2000\nChannel Islands,5.0\nUnited Kingdom,6.5\n",
    "country,2000\nUnited Kingdom,1.6\n",
    "country,2000\nUnited Kingdom,52\n",
  );
  assert_eq!(out.dataset.len(), 1);
  let row = &out.dataset.rows()[0];
  assert_eq!(row.country_code.as_str(), "GBR");
  assert_eq!(row.mortality, 6.5);

  let mortality = out.diagnostics.source(Metric::ChildMortality).unwrap();
  assert_eq!(mortality.dropped.duplicates, 1);
  assert_eq!(mortality.keyed, 1);
}

#[test]
fn unresolved_names_are_rejected_and_listed() {
  let out = build_from(
    "country,2000\nAtlantis,12\nChad,180\n",
    "country,2000\nAtlantis,3\nChad,7\n",
    "country,2000\nAtlantis,50\nChad,60\n",
  );
  assert_eq!(out.dataset.len(), 1);
  assert_eq!(out.diagnostics.unresolved_names, vec!["Atlantis".to_string()]);
  for report in &out.diagnostics.sources {
    assert_eq!(report.dropped.unresolved, 1, "{}", report.metric);
  }
}

// ─── Filtering and defects ───────────────────────────────────────────────────

#[test]
fn years_outside_the_range_are_dropped() {
  let out = build_from(
    "country,1990,2000,2020\nChad,200,180,150\n",
    "country,1990,2000,2020\nChad,7.2,7.0,6.0\n",
    "country,1990,2000,2020\nChad,58,60,65\n",
  );
  let years: Vec<_> = out.dataset.iter().map(|r| r.year).collect();
  assert_eq!(years, vec![2000]);
  let fertility = out.diagnostics.source(Metric::Fertility).unwrap();
  assert_eq!(fertility.records, 3);
  assert_eq!(fertility.dropped.out_of_range, 2);
}

#[test]
fn malformed_rows_are_reported_not_fatal() {
  let out = build_from(
    "country,2000\nChad,180\nPeru,abc\n,5\n",
    "country,2000\nChad,7\nPeru,2.6\n",
    "country,2000,note\nChad,60,x\nPeru,55,y\n",
  );
  assert_eq!(out.dataset.len(), 1);

  let mortality = out.diagnostics.source(Metric::ChildMortality).unwrap();
  assert_eq!(mortality.rows, 1);
  assert_eq!(mortality.row_defects.len(), 2);
  assert!(matches!(mortality.row_defects[0].issue, RowIssue::BadCell { .. }));
  assert_eq!(mortality.row_defects[1].issue, RowIssue::MissingCountry);

  let employment = out.diagnostics.source(Metric::EmploymentRate).unwrap();
  assert_eq!(employment.column_defects.len(), 1);
  assert_eq!(out.diagnostics.row_defect_count(), 2);
}

#[test]
fn empty_sources_give_an_empty_dataset() {
  let out = build_from("country\n", "country\n", "country\n");
  assert!(out.dataset.is_empty());
  assert_eq!(out.diagnostics.dataset_rows, 0);
}

// ─── Configuration and I/O ───────────────────────────────────────────────────

#[test]
fn missing_input_names_metric_and_path() {
  let config = BuildConfig {
    inputs: InputPaths {
      mortality:  PathBuf::from("/nonexistent/vitals/mortality.csv"),
      fertility:  PathBuf::from("/nonexistent/vitals/fertility.csv"),
      employment: PathBuf::from("/nonexistent/vitals/employment.csv"),
    },
    ..BuildConfig::default()
  };
  let err = run(&config).unwrap_err();
  assert!(matches!(
    err,
    Error::MissingInput {
      metric: Metric::ChildMortality,
      ..
    }
  ));
  let message = err.to_string();
  assert!(message.contains("child_mortality"), "{message}");
  assert!(message.contains("/nonexistent/vitals/mortality.csv"), "{message}");
}

#[test]
fn unreadable_input_is_a_read_error_not_missing() {
  let dir = std::env::temp_dir();
  let config = BuildConfig {
    inputs: InputPaths {
      mortality:  dir.clone(),
      fertility:  dir.clone(),
      employment: dir.clone(),
    },
    ..BuildConfig::default()
  };
  let err = run(&config).unwrap_err();
  assert!(matches!(err, Error::Read { ref path, .. } if *path == dir), "{err}");
}

#[test]
fn invalid_aliases_fail_before_loading() {
  let mut config = BuildConfig::default();
  config.aliases = vec![
    AliasEntry {
      from: "UAE".into(),
      to:   "Chad".into(),
    },
    AliasEntry {
      from: "Tchad".into(),
      to:   "UAE".into(),
    },
  ];
  assert!(matches!(run(&config), Err(Error::ChainedAlias { .. })));
}

#[test]
fn configured_aliases_extend_the_defaults() {
  let sources = Sources::from_tables(
    "country,2000\nTchad,180\n",
    "country,2000\nChad,7\n",
    "country,2000\nChad,60\n",
  )
  .unwrap();
  let harmonizer = Harmonizer::new([("Tchad".to_string(), "Chad".to_string())])
    .unwrap();
  let out =
    build(&sources, &harmonizer, &resolver(), YearRange::default()).unwrap();
  assert_eq!(out.dataset.len(), 1);
  assert_eq!(out.dataset.rows()[0].country, "Chad");
}
