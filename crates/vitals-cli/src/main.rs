//! `vitals`: build and summarize the child-mortality / fertility /
//! employment dataset.
//!
//! # Usage
//!
//! ```text
//! vitals build
//! vitals --config other.toml build --start 2000 --end 2015
//! vitals summarize --dataset out/dataset.csv
//! vitals resolve "UAE" "Congo, Dem. Rep."
//! ```
//!
//! Configuration is read from `vitals.toml` (optional), then from `VITALS_*`
//! environment variables (`VITALS_YEARS__START=2000`), then from flags.
//! Extra aliases are an array of tables in the file:
//!
//! ```toml
//! [[aliases]]
//! from = "Tchad"
//! to = "Chad"
//! ```

use std::{
  fs::{self, File},
  io::{self, BufReader, BufWriter, Write},
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vitals_core::{country::Resolution, resolver::CountryResolver, table::YearRange};
use vitals_pipeline::{BuildConfig, Harmonizer};
use vitals_report::Summary;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vitals", version, about = "Country health and employment dataset builder")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "vitals.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Load the sources, write the joined dataset and its summary.
  Build(BuildArgs),

  /// Recompute the summary from an exported dataset.
  Summarize {
    /// Dataset CSV previously written by `vitals build`.
    #[arg(long, value_name = "CSV")]
    dataset: PathBuf,

    /// Write the summary here instead of stdout.
    #[arg(short, long, value_name = "JSON")]
    out: Option<PathBuf>,
  },

  /// Show how country names canonicalize and resolve.
  Resolve {
    #[arg(required = true, value_name = "NAME")]
    names: Vec<String>,
  },
}

#[derive(clap::Args, Debug, Default)]
struct BuildArgs {
  /// Child mortality source table.
  #[arg(long, value_name = "CSV")]
  mortality: Option<PathBuf>,

  /// Fertility source table.
  #[arg(long, value_name = "CSV")]
  fertility: Option<PathBuf>,

  /// Female employment rate source table.
  #[arg(long, value_name = "CSV")]
  employment: Option<PathBuf>,

  /// First year kept (inclusive).
  #[arg(long)]
  start: Option<i32>,

  /// Last year kept (inclusive).
  #[arg(long)]
  end: Option<i32>,

  /// Enable fuzzy name matching at this minimum score.
  #[arg(long)]
  fuzzy_threshold: Option<i64>,

  /// Output path of the dataset CSV.
  #[arg(long, value_name = "CSV")]
  dataset_out: Option<PathBuf>,

  /// Output path of the summary JSON.
  #[arg(long, value_name = "JSON")]
  summary_out: Option<PathBuf>,
}

impl BuildArgs {
  /// Flags override whatever the file and environment provided.
  fn apply(self, config: &mut BuildConfig) -> Result<()> {
    if let Some(path) = self.mortality {
      config.inputs.mortality = path;
    }
    if let Some(path) = self.fertility {
      config.inputs.fertility = path;
    }
    if let Some(path) = self.employment {
      config.inputs.employment = path;
    }
    if self.start.is_some() || self.end.is_some() {
      config.years = YearRange::new(
        self.start.unwrap_or(config.years.start()),
        self.end.unwrap_or(config.years.end()),
      )
      .context("invalid year range")?;
    }
    if self.fuzzy_threshold.is_some() {
      config.fuzzy_threshold = self.fuzzy_threshold;
    }
    if let Some(path) = self.dataset_out {
      config.output.dataset = path;
    }
    if let Some(path) = self.summary_out {
      config.output.summary = path;
    }
    Ok(())
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let mut config = load_config(&cli.config)?;

  match cli.command {
    Command::Build(args) => {
      args.apply(&mut config)?;
      build(&config)
    }
    Command::Summarize { dataset, out } => summarize(&config, &dataset, out.as_deref()),
    Command::Resolve { names } => resolve(&config, &names),
  }
}

fn load_config(path: &Path) -> Result<BuildConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("VITALS")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let config: BuildConfig = settings
    .try_deserialize()
    .context("failed to deserialise BuildConfig")?;
  config.validate().context("invalid configuration")?;
  Ok(config)
}

// ─── Commands ─────────────────────────────────────────────────────────────────

fn build(config: &BuildConfig) -> Result<()> {
  let output = vitals_pipeline::run(config).context("build failed")?;

  let dataset_path = &config.output.dataset;
  let writer = create(dataset_path)?;
  vitals_csv::write_facts(writer, &output.dataset)
    .with_context(|| format!("failed to write {}", dataset_path.display()))?;

  let summary = Summary::compute(&output.dataset, &config.percentiles)
    .with_diagnostics(output.diagnostics);
  let summary_path = &config.output.summary;
  write_summary(create(summary_path)?, &summary)
    .with_context(|| format!("failed to write {}", summary_path.display()))?;

  tracing::info!(
    rows = summary.rows,
    countries = summary.countries,
    dataset = %dataset_path.display(),
    summary = %summary_path.display(),
    "build complete"
  );
  Ok(())
}

fn summarize(config: &BuildConfig, dataset: &Path, out: Option<&Path>) -> Result<()> {
  let file = File::open(dataset)
    .with_context(|| format!("failed to open {}", dataset.display()))?;
  let dataset = vitals_csv::read_facts(BufReader::new(file))
    .with_context(|| format!("failed to read dataset {}", dataset.display()))?;
  let summary = Summary::compute(&dataset, &config.percentiles);

  match out {
    Some(path) => write_summary(create(path)?, &summary)
      .with_context(|| format!("failed to write {}", path.display())),
    None => write_summary(io::stdout().lock(), &summary).context("failed to write summary"),
  }
}

fn resolve(config: &BuildConfig, names: &[String]) -> Result<()> {
  let harmonizer =
    Harmonizer::new(config.alias_pairs()).context("invalid alias table")?;
  let resolver =
    vitals_pipeline::resolver_for(config).context("failed to build resolver")?;

  let mut stdout = io::stdout().lock();
  for name in names {
    let canonical = harmonizer.canonicalize_name(name);
    match resolver.resolve(canonical) {
      Resolution::Resolved { code, continent } => {
        writeln!(stdout, "{name}\t{canonical}\t{code}\t{continent}")?;
      }
      Resolution::Unresolved => writeln!(stdout, "{name}\t{canonical}\tunresolved")?,
    }
  }
  Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Create `path` for writing, along with any missing parent directories.
fn create(path: &Path) -> Result<BufWriter<File>> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let file =
    File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
  Ok(BufWriter::new(file))
}

fn write_summary<W: Write>(mut writer: W, summary: &Summary) -> Result<()> {
  serde_json::to_writer_pretty(&mut writer, summary)?;
  writeln!(writer)?;
  writer.flush()?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_parses_subcommands() {
    let cli = Cli::try_parse_from(["vitals", "resolve", "UAE", "Chad"]).unwrap();
    assert!(matches!(cli.command, Command::Resolve { ref names } if names.len() == 2));
    assert_eq!(cli.config, PathBuf::from("vitals.toml"));

    let cli =
      Cli::try_parse_from(["vitals", "summarize", "--dataset", "d.csv"]).unwrap();
    assert!(matches!(cli.command, Command::Summarize { out: None, .. }));

    assert!(Cli::try_parse_from(["vitals", "resolve"]).is_err());
  }

  #[test]
  fn build_flags_override_config() {
    let mut config = BuildConfig::default();
    let args = BuildArgs {
      fertility: Some("f.csv".into()),
      start: Some(2000),
      fuzzy_threshold: Some(80),
      ..BuildArgs::default()
    };
    args.apply(&mut config).unwrap();

    assert_eq!(config.inputs.fertility, PathBuf::from("f.csv"));
    assert_eq!(config.years, YearRange::new(2000, 2019).unwrap());
    assert_eq!(config.fuzzy_threshold, Some(80));
  }

  #[test]
  fn inverted_year_flags_are_rejected() {
    let mut config = BuildConfig::default();
    let args = BuildArgs {
      start: Some(2019),
      end: Some(2000),
      ..BuildArgs::default()
    };
    assert!(args.apply(&mut config).is_err());
  }

  fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
      .suffix(".toml")
      .tempfile()
      .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
  }

  #[test]
  fn config_file_aliases_keep_their_case() {
    let file = toml_file(
      r#"
[[aliases]]
from = "Tchad"
to = "Chad"

[[aliases]]
from = "DR Congo"
to = "Democratic Republic of the Congo"
"#,
    );
    let config = load_config(file.path()).unwrap();
    let harmonizer = Harmonizer::new(config.alias_pairs()).unwrap();

    assert_eq!(harmonizer.canonicalize_name("Tchad"), "Chad");
    assert_eq!(
      harmonizer.canonicalize_name("DR Congo"),
      "Democratic Republic of the Congo"
    );
    assert_eq!(harmonizer.canonicalize_name("UAE"), "United Arab Emirates");
  }

  #[test]
  fn single_underscore_prefix_env_var_applies() {
    // SAFETY: the other tests only read the environment through `config` and
    // none of them depend on `years`.
    unsafe { std::env::set_var("VITALS_YEARS__START", "2005") };
    let config = load_config(Path::new("/nonexistent/vitals.toml"));
    unsafe { std::env::remove_var("VITALS_YEARS__START") };

    let config = config.unwrap();
    assert_eq!(config.years, YearRange::new(2005, 2019).unwrap());
  }

  #[test]
  fn missing_config_file_gives_defaults() {
    let config = load_config(Path::new("/nonexistent/vitals.toml")).unwrap();
    assert_eq!(config.percentiles, BuildConfig::default().percentiles);
  }
}
