//! Numeric cell parsing.
//!
//! Source exports write large values with a magnitude suffix (`12.3k`) and
//! negatives with U+2212 MINUS SIGN, so plain `str::parse` is not enough.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
  #[error("not a number: {0:?}")]
  NotANumber(String),
  #[error("not a finite number: {0:?}")]
  NonFinite(String),
}

/// Parse one cell. Blank cells are `Ok(None)`.
pub fn parse_cell(raw: &str) -> Result<Option<f64>, CellError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }

  let normalized = trimmed.replace('\u{2212}', "-");
  let (digits, scale) = match normalized.chars().last() {
    Some('k' | 'K') => (&normalized[..normalized.len() - 1], 1e3),
    Some('M') => (&normalized[..normalized.len() - 1], 1e6),
    _ => (normalized.as_str(), 1.0),
  };

  let value: f64 = digits
    .trim()
    .parse()
    .map_err(|_| CellError::NotANumber(raw.to_string()))?;
  let value = value * scale;
  if !value.is_finite() {
    return Err(CellError::NonFinite(raw.to_string()));
  }
  Ok(Some(value))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_is_missing_not_zero() {
    assert_eq!(parse_cell(""), Ok(None));
    assert_eq!(parse_cell("   "), Ok(None));
  }

  #[test]
  fn plain_numbers() {
    assert_eq!(parse_cell("4.5"), Ok(Some(4.5)));
    assert_eq!(parse_cell(" 12 "), Ok(Some(12.0)));
    assert_eq!(parse_cell("\u{2212}1.5"), Ok(Some(-1.5)));
  }

  #[test]
  fn magnitude_suffixes() {
    assert_eq!(parse_cell("1.5k"), Ok(Some(1500.0)));
    assert_eq!(parse_cell("3M"), Ok(Some(3_000_000.0)));
  }

  #[test]
  fn rejects_garbage_and_non_finite() {
    assert!(matches!(parse_cell("n/a"), Err(CellError::NotANumber(_))));
    assert!(matches!(parse_cell("k"), Err(CellError::NotANumber(_))));
    assert!(matches!(parse_cell("NaN"), Err(CellError::NonFinite(_))));
    assert!(matches!(parse_cell("inf"), Err(CellError::NonFinite(_))));
  }
}
