//! Dataset export and re-import.

use serde::{Deserialize, Serialize};
use vitals_core::{
  country::{Continent, Iso3},
  fact::{Dataset, FactRow},
  table::Year,
};

use crate::error::Result;

/// Header row of the exported dataset, in column order.
pub const FACT_HEADERS: [&str; 7] = [
  "Country/area",
  "Country Code",
  "Continent",
  "Year",
  "Child Mortality",
  "Fertility Rate",
  "Employment Rate",
];

/// On-disk shape of a fact row. Field renames must match [`FACT_HEADERS`].
#[derive(Serialize, Deserialize)]
struct FactRecord {
  #[serde(rename = "Country/area")]
  country:         String,
  #[serde(rename = "Country Code")]
  country_code:    Iso3,
  #[serde(rename = "Continent")]
  continent:       Continent,
  #[serde(rename = "Year")]
  year:            Year,
  #[serde(rename = "Child Mortality")]
  mortality:       f64,
  #[serde(rename = "Fertility Rate")]
  fertility:       f64,
  #[serde(rename = "Employment Rate")]
  employment_rate: f64,
}

impl From<&FactRow> for FactRecord {
  fn from(row: &FactRow) -> Self {
    Self {
      country:         row.country.clone(),
      country_code:    row.country_code.clone(),
      continent:       row.continent,
      year:            row.year,
      mortality:       row.mortality,
      fertility:       row.fertility,
      employment_rate: row.employment_rate,
    }
  }
}

impl From<FactRecord> for FactRow {
  fn from(rec: FactRecord) -> Self {
    Self {
      country:         rec.country,
      country_code:    rec.country_code,
      continent:       rec.continent,
      year:            rec.year,
      mortality:       rec.mortality,
      fertility:       rec.fertility,
      employment_rate: rec.employment_rate,
    }
  }
}

/// Write `dataset` as CSV, header first, rows in dataset order.
pub fn write_facts<W: std::io::Write>(writer: W, dataset: &Dataset) -> Result<()> {
  let mut writer = csv::Writer::from_writer(writer);
  if dataset.is_empty() {
    // serde only emits the header alongside the first record.
    writer.write_record(FACT_HEADERS)?;
  }
  for row in dataset {
    writer.serialize(FactRecord::from(row))?;
  }
  writer.flush()?;
  Ok(())
}

/// Read a dataset previously written by [`write_facts`].
///
/// Unlike source tables this format is produced by us, so any malformed row
/// fails the whole read.
pub fn read_facts<R: std::io::Read>(reader: R) -> Result<Dataset> {
  let mut reader = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .from_reader(reader);
  let rows = reader
    .deserialize::<FactRecord>()
    .map(|r| r.map(FactRow::from))
    .collect::<std::result::Result<Vec<_>, _>>()?;
  Ok(Dataset::new(rows)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn sample() -> Dataset {
    Dataset::new(vec![
      FactRow {
        country:         "United Arab Emirates".into(),
        country_code:    Iso3::new("ARE").unwrap(),
        continent:       Continent::Asia,
        year:            2000,
        mortality:       11.2,
        fertility:       2.6,
        employment_rate: 35.5,
      },
      FactRow {
        country:         "Congo, Dem. Rep.".into(),
        country_code:    Iso3::new("COD").unwrap(),
        continent:       Continent::Africa,
        year:            2000,
        mortality:       161.0,
        fertility:       6.7,
        employment_rate: 60.1,
      },
    ])
    .unwrap()
  }

  #[test]
  fn writes_header_and_rows_in_dataset_order() {
    let mut out = Vec::new();
    write_facts(&mut out, &sample()).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(FACT_HEADERS.join(",").as_str()));
    assert_eq!(
      lines.next(),
      Some("United Arab Emirates,ARE,Asia,2000,11.2,2.6,35.5")
    );
    assert_eq!(
      lines.next(),
      Some("\"Congo, Dem. Rep.\",COD,Africa,2000,161.0,6.7,60.1")
    );
    assert_eq!(lines.next(), None);
  }

  #[test]
  fn empty_dataset_still_has_header() {
    let mut out = Vec::new();
    write_facts(&mut out, &Dataset::default()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().trim_end(), FACT_HEADERS.join(","));
  }

  #[test]
  fn exported_dataset_reads_back() {
    let ds = sample();
    let mut out = Vec::new();
    write_facts(&mut out, &ds).unwrap();
    let back = read_facts(out.as_slice()).unwrap();
    assert_eq!(back, ds);
  }

  #[test]
  fn read_rejects_bad_codes() {
    let input = format!(
      "{}\nNowhere,XX,Asia,2000,1,2,3\n",
      FACT_HEADERS.join(",")
    );
    assert!(matches!(read_facts(input.as_bytes()), Err(Error::Csv(_))));
  }

  #[test]
  fn headers_match_metric_columns() {
    use vitals_core::table::Metric;
    assert_eq!(FACT_HEADERS[4], Metric::ChildMortality.column_header());
    assert_eq!(FACT_HEADERS[5], Metric::Fertility.column_header());
    assert_eq!(FACT_HEADERS[6], Metric::EmploymentRate.column_header());
  }
}
