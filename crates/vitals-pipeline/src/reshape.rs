//! Wide → long reshaping.

use vitals_core::table::{LongRecord, LongTable, Metric, WideTable};

/// Melt `wide` into one record per (country, year column), row-major in
/// source order. Blank cells stay `None`; nothing is dropped or invented, so
/// the output always holds `rows × year columns` records.
pub fn reshape(wide: &WideTable, metric: Metric) -> LongTable {
  let records = wide
    .rows()
    .iter()
    .flat_map(|row| {
      wide
        .years()
        .iter()
        .zip(&row.values)
        .map(|(&year, &value)| LongRecord {
          country: row.country.clone(),
          year,
          value,
        })
    })
    .collect();

  LongTable { metric, records }
}
