//! Content digest of a dataset.
//!
//! The digest is a SHA-256 hash over every row in `(country_code, year)`
//! order, so two datasets with the same rows hash alike however their sources
//! were ordered.

use sha2::{Digest, Sha256};
use vitals_core::fact::{Dataset, FactRow};

/// Hex-encoded SHA-256 of `dataset`.
pub fn dataset_digest(dataset: &Dataset) -> String {
  let mut hasher = Sha256::new();
  for row in dataset {
    hash_row(&mut hasher, row);
  }
  hex::encode(hasher.finalize())
}

fn hash_row(hasher: &mut Sha256, row: &FactRow) {
  hasher.update(row.country_code.as_str().as_bytes());
  hasher.update(row.year.to_le_bytes());
  // Length-prefixed so adjacent names cannot run together.
  hasher.update((row.country.len() as u64).to_le_bytes());
  hasher.update(row.country.as_bytes());
  hasher.update(row.continent.to_string().as_bytes());
  hasher.update([0u8]);
  for value in [row.mortality, row.fertility, row.employment_rate] {
    hasher.update(value.to_bits().to_le_bytes());
  }
}
