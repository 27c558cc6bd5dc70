//! Wide-table parser.
//!
//! Pipeline:
//!   raw bytes
//!     └─ csv::Reader (flexible, trimmed)
//!          └─ classify_header()  → year columns + column defects
//!               └─ parse_row()   → WideRow or RowDefect
//!                    └─ WideTable::push_row()

use csv::{ReaderBuilder, StringRecord, Trim};
use vitals_core::table::{WideRow, WideTable, Year};

use crate::{
  ColumnDefect, ColumnIssue, ParsedWide, RowDefect, RowIssue,
  error::{Error, Result},
  value::parse_cell,
};

/// A retained header column: its position in each record and its year.
struct YearColumn {
  index: usize,
  year:  Year,
}

// ─── Header ──────────────────────────────────────────────────────────────────

/// Split the header into usable year columns and skipped columns. Column 0 is
/// always the country field, whatever its label.
fn classify_header(headers: &StringRecord) -> (Vec<YearColumn>, Vec<ColumnDefect>) {
  let mut columns: Vec<YearColumn> = Vec::new();
  let mut defects = Vec::new();

  for (index, label) in headers.iter().enumerate().skip(1) {
    match label.parse::<Year>() {
      Ok(year) if columns.iter().any(|c| c.year == year) => {
        defects.push(ColumnDefect {
          label: label.to_string(),
          issue: ColumnIssue::DuplicateYear,
        });
      }
      Ok(year) => columns.push(YearColumn { index, year }),
      Err(_) => defects.push(ColumnDefect {
        label: label.to_string(),
        issue: ColumnIssue::NotAYear,
      }),
    }
  }

  (columns, defects)
}

// ─── Rows ────────────────────────────────────────────────────────────────────

fn parse_row(
  record: &StringRecord,
  width: usize,
  columns: &[YearColumn],
) -> std::result::Result<WideRow, (Option<String>, RowIssue)> {
  let country = record
    .get(0)
    .map(str::trim)
    .filter(|c| !c.is_empty())
    .map(str::to_string);

  if record.len() != width {
    return Err((
      country,
      RowIssue::FieldCount {
        expected: width,
        found:    record.len(),
      },
    ));
  }

  let Some(country) = country else {
    return Err((None, RowIssue::MissingCountry));
  };

  let mut values = Vec::with_capacity(columns.len());
  for column in columns {
    let raw = record.get(column.index).unwrap_or_default();
    match parse_cell(raw) {
      Ok(value) => values.push(value),
      Err(_) => {
        return Err((
          Some(country),
          RowIssue::BadCell {
            label: column.year.to_string(),
            value: raw.to_string(),
          },
        ));
      }
    }
  }

  Ok(WideRow { country, values })
}

// ─── Entry point ─────────────────────────────────────────────────────────────

pub(crate) fn parse<R: std::io::Read>(reader: R) -> Result<ParsedWide> {
  let mut reader = ReaderBuilder::new()
    .flexible(true)
    .trim(Trim::All)
    .from_reader(reader);

  let headers = reader.headers()?.clone();
  if headers.is_empty() {
    return Err(Error::MissingHeader);
  }

  let (columns, column_defects) = classify_header(&headers);
  let mut table =
    WideTable::new(columns.iter().map(|c| c.year).collect::<Vec<_>>())?;
  let mut row_defects = Vec::new();

  for result in reader.records() {
    let record = match result {
      Ok(record) => record,
      Err(e) if e.is_io_error() => return Err(e.into()),
      Err(e) => {
        row_defects.push(RowDefect {
          line:    e.position().map(|p| p.line()),
          country: None,
          issue:   RowIssue::Unreadable {
            message: e.to_string(),
          },
        });
        continue;
      }
    };
    let line = record.position().map(|p| p.line());

    match parse_row(&record, headers.len(), &columns) {
      Ok(row) => table.push_row(row)?,
      Err((country, issue)) => row_defects.push(RowDefect {
        line,
        country,
        issue,
      }),
    }
  }

  Ok(ParsedWide {
    table,
    row_defects,
    column_defects,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse_str(input: &str) -> ParsedWide { parse(input.as_bytes()).unwrap() }

  #[test]
  fn parses_years_and_blank_cells() {
    let parsed = parse_str("country,1991,1992\nChad,210.5,\nMali,,180\n");
    assert_eq!(parsed.table.years(), &[1991, 1992]);
    assert_eq!(parsed.table.len(), 2);
    assert_eq!(parsed.table.rows()[0].country, "Chad");
    assert_eq!(parsed.table.rows()[0].values, vec![Some(210.5), None]);
    assert_eq!(parsed.table.rows()[1].values, vec![None, Some(180.0)]);
    assert!(parsed.row_defects.is_empty());
    assert!(parsed.column_defects.is_empty());
  }

  #[test]
  fn empty_input_is_missing_header() {
    assert!(matches!(parse("".as_bytes()), Err(Error::MissingHeader)));
  }

  #[test]
  fn header_only_gives_empty_table() {
    let parsed = parse_str("country,2000,2001\n");
    assert!(parsed.table.is_empty());
    assert_eq!(parsed.table.years().len(), 2);
  }

  #[test]
  fn non_year_and_duplicate_columns_are_skipped() {
    let parsed = parse_str("country,2000,notes,2000,2001\nChad,1,x,2,3\n");
    assert_eq!(parsed.table.years(), &[2000, 2001]);
    assert_eq!(parsed.table.rows()[0].values, vec![Some(1.0), Some(3.0)]);
    assert_eq!(parsed.column_defects, vec![
      ColumnDefect {
        label: "notes".into(),
        issue: ColumnIssue::NotAYear,
      },
      ColumnDefect {
        label: "2000".into(),
        issue: ColumnIssue::DuplicateYear,
      },
    ]);
  }

  #[test]
  fn malformed_rows_are_rejected_and_rest_kept() {
    let input = "country,2000,2001\n\
                 ,1,2\n\
                 Chad,1\n\
                 Mali,abc,2\n\
                 Niger,4,5\n";
    let parsed = parse_str(input);

    assert_eq!(parsed.table.len(), 1);
    assert_eq!(parsed.table.rows()[0].country, "Niger");

    let issues: Vec<_> =
      parsed.row_defects.iter().map(|d| d.issue.clone()).collect();
    assert_eq!(issues, vec![
      RowIssue::MissingCountry,
      RowIssue::FieldCount {
        expected: 3,
        found:    2,
      },
      RowIssue::BadCell {
        label: "2000".into(),
        value: "abc".into(),
      },
    ]);
    assert_eq!(parsed.row_defects[0].line, Some(2));
    assert_eq!(parsed.row_defects[2].country.as_deref(), Some("Mali"));
  }

  #[test]
  fn quoted_country_names_with_commas() {
    let parsed = parse_str("country,2000\n\"Congo, Dem. Rep.\",98.1\n");
    assert_eq!(parsed.table.rows()[0].country, "Congo, Dem. Rep.");
  }
}
