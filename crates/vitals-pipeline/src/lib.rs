//! The vitals build pipeline.
//!
//! Loads the three wide source tables, reshapes them to long form,
//! harmonizes country names through a [`CountryResolver`], joins the metrics
//! by `(country_code, year)` and returns the complete rows as a [`Dataset`].
//!
//! Each stage is a pure function over owned values; only [`load_sources`]
//! and [`run`] touch the filesystem.
//!
//! [`CountryResolver`]: vitals_core::resolver::CountryResolver
//! [`Dataset`]: vitals_core::fact::Dataset

mod build;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod harmonize;
pub mod join;
mod load;
mod reshape;

pub use build::{BuildOutput, build, resolver_for, run};
pub use config::{AliasEntry, BuildConfig};
pub use diagnostics::{BuildDiagnostics, SourceReport};
pub use error::{Error, Result};
pub use harmonize::{CountryIndex, DEFAULT_ALIASES, Harmonizer};
pub use load::{Sources, load_sources};
pub use reshape::reshape;

#[cfg(test)]
mod tests;
