//! The `CountryResolver` trait.
//!
//! The trait is implemented by resolution backends (e.g. `vitals-resolve`).
//! The pipeline depends on this abstraction, not on any concrete lookup
//! strategy, so its correctness never hinges on a matching heuristic.

use crate::country::Resolution;

/// Maps a free-text country or region name to an ISO3 code and continent.
///
/// Implementations must be pure: the same `name` always yields the same
/// [`Resolution`] for the lifetime of the resolver.
pub trait CountryResolver {
  fn resolve(&self, name: &str) -> Resolution;
}

impl<R: CountryResolver + ?Sized> CountryResolver for &R {
  fn resolve(&self, name: &str) -> Resolution { (**self).resolve(name) }
}
