//! Table-backed country name resolution for vitals.
//!
//! Implements [`vitals_core::resolver::CountryResolver`] over a country table
//! compiled into the binary, optionally extended by a user lookup file.

mod normalize;
mod table;

pub mod error;

pub use error::{Error, Result};
pub use table::TableResolver;
