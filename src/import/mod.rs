pub mod columns;
pub mod grid;

use thiserror::Error;

use crate::error::AppError;
use crate::models::{today_iso, Transaction, DEFAULT_ITEM_NAME};
use crate::store;
use self::grid::{Cell, Grid};

/// Excel serial dates count days from 1899-12-30; 1970-01-01 is serial 25569.
const EXCEL_EPOCH_OFFSET_DAYS: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

#[derive(Debug, Error)]
pub enum ImportError {
  #[error("{0}")]
  Parse(String),
  #[error("file contains no readable sheet")]
  NoSheet,
  #[error("no usable rows found in file")]
  Empty,
}

impl From<csv::Error> for ImportError {
  fn from(err: csv::Error) -> Self {
    ImportError::Parse(err.to_string())
  }
}

impl From<ImportError> for AppError {
  fn from(err: ImportError) -> Self {
    match err {
      ImportError::Empty => AppError::new("IMPORT_EMPTY", err.to_string()),
      other => AppError::new("IMPORT_PARSE", other.to_string()),
    }
  }
}

#[derive(Debug)]
pub struct ImportResult {
  pub transactions: Vec<Transaction>,
  pub warnings: Vec<String>,
}

/// Parses an uploaded file into normalized transactions. Delimited text goes
/// through the csv reader, everything else is treated as a workbook.
pub fn parse_file(file_name: &str, bytes: &[u8]) -> Result<ImportResult, ImportError> {
  let extension = file_name
    .rsplit_once('.')
    .map(|(_, ext)| ext.to_ascii_lowercase())
    .unwrap_or_default();

  let grid = match extension.as_str() {
    "csv" | "txt" => grid::read_delimited(bytes)?,
    _ => grid::read_spreadsheet(bytes)?,
  };

  normalize_grid(grid)
}

/// Turns a raw grid into transaction records: locate the header, map columns,
/// then normalize every data row. Rows that are empty or entirely falsy are
/// skipped; everything else gets per-field defaults.
pub fn normalize_grid(grid: Grid) -> Result<ImportResult, ImportError> {
  if grid.len() < 2 {
    return Err(ImportError::Empty);
  }

  let layout = columns::detect_layout(&grid);
  let mut warnings = Vec::new();
  if !layout.header_matched {
    warnings.push("No obvious header row found, assuming the first row".to_string());
  }

  let cols = &layout.columns;
  let mut transactions = Vec::new();

  for row in grid.iter().skip(layout.header_row + 1) {
    if row.is_empty() || row.iter().all(Cell::is_falsy) {
      continue;
    }

    let cell = |index: Option<usize>| {
      index
        .and_then(|i| row.get(i))
        .cloned()
        .unwrap_or(Cell::Empty)
    };

    let item_cell = cell(cols.item_name);
    let item_name = if item_cell.is_falsy() {
      DEFAULT_ITEM_NAME.to_string()
    } else {
      item_cell.as_text()
    };

    transactions.push(Transaction {
      id: store::new_txn_id(),
      bill_no: cell(cols.bill_no).as_text(),
      date: convert_date(&cell(cols.date)),
      vehicle_no: cell(cols.vehicle_no).as_text().to_uppercase(),
      indent: cell(cols.indent).as_text(),
      item_name,
      quantity: cell(cols.quantity).as_number().unwrap_or(0.0),
      rate: cell(cols.rate).as_number().unwrap_or(0.0),
      amount: cell(cols.amount).as_number().unwrap_or(0.0),
    });
  }

  if transactions.is_empty() {
    return Err(ImportError::Empty);
  }

  Ok(ImportResult {
    transactions,
    warnings,
  })
}

fn convert_date(cell: &Cell) -> String {
  if cell.is_falsy() {
    return today_iso();
  }
  match cell {
    Cell::Number(serial) => serial_to_iso(*serial),
    other => other.as_text(),
  }
}

/// Converts an Excel serial date to an ISO calendar date.
pub fn serial_to_iso(serial: f64) -> String {
  let seconds = ((serial - EXCEL_EPOCH_OFFSET_DAYS) * SECONDS_PER_DAY).round() as i64;
  match chrono::DateTime::from_timestamp(seconds, 0) {
    Some(moment) => moment.format("%Y-%m-%d").to_string(),
    None => today_iso(),
  }
}

#[cfg(test)]
mod tests {
  use super::grid::Cell;
  use super::*;

  fn text_row(cells: &[&str]) -> Vec<Cell> {
    cells
      .iter()
      .map(|value| {
        if value.is_empty() {
          Cell::Empty
        } else {
          Cell::Text(value.to_string())
        }
      })
      .collect()
  }

  fn sample_grid() -> Grid {
    vec![
      text_row(&["Harsha Highway Petroleum", "", "", "", "", ""]),
      text_row(&["Deliveries March 2024", "", "", "", "", ""]),
      text_row(&["Date", "Bill", "Vehicle", "Qty", "Rate", "Amount"]),
      vec![
        Cell::Text("2024-03-01".to_string()),
        Cell::Number(101.0),
        Cell::Text("ka25ab1234".to_string()),
        Cell::Number(100.0),
        Cell::Number(90.5),
        Cell::Number(9050.0),
      ],
      vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
      vec![
        Cell::Number(45352.0),
        Cell::Text("B-102".to_string()),
        Cell::Empty,
        Cell::Text("".to_string()),
        Cell::Empty,
        Cell::Number(1200.0),
      ],
    ]
  }

  #[test]
  fn output_length_matches_non_empty_data_rows() {
    let result = normalize_grid(sample_grid()).expect("normalize");
    assert_eq!(result.transactions.len(), 2);
    assert!(result.warnings.is_empty());
  }

  #[test]
  fn rows_are_normalized_field_by_field() {
    let result = normalize_grid(sample_grid()).expect("normalize");
    let first = &result.transactions[0];
    assert_eq!(first.date, "2024-03-01");
    assert_eq!(first.bill_no, "101");
    assert_eq!(first.vehicle_no, "KA25AB1234");
    assert_eq!(first.item_name, DEFAULT_ITEM_NAME);
    assert_eq!(first.quantity, 100.0);
    assert_eq!(first.rate, 90.5);
    assert_eq!(first.amount, 9050.0);
    assert!(!first.id.is_empty());

    let second = &result.transactions[1];
    assert_eq!(second.date, "2024-03-01");
    assert_eq!(second.bill_no, "B-102");
    assert_eq!(second.quantity, 0.0);
    assert_eq!(second.rate, 0.0);
    assert_ne!(first.id, second.id);
  }

  #[test]
  fn serial_dates_use_the_1899_epoch() {
    assert_eq!(serial_to_iso(44927.0), "2023-01-01");
    assert_eq!(serial_to_iso(25569.0), "1970-01-01");
    assert_eq!(serial_to_iso(45352.0), "2024-03-01");
  }

  #[test]
  fn fractional_serials_keep_the_day() {
    assert_eq!(serial_to_iso(44927.25), "2023-01-01");
  }

  #[test]
  fn short_grids_are_an_empty_import() {
    let error = normalize_grid(vec![text_row(&["Date", "Qty"])]).unwrap_err();
    assert!(matches!(error, ImportError::Empty));
    let error = normalize_grid(Vec::new()).unwrap_err();
    assert!(matches!(error, ImportError::Empty));
  }

  #[test]
  fn all_blank_data_rows_are_an_empty_import() {
    let grid = vec![
      text_row(&["Date", "Qty"]),
      vec![Cell::Empty, Cell::Number(0.0)],
    ];
    let error = normalize_grid(grid).unwrap_err();
    assert!(matches!(error, ImportError::Empty));
  }

  #[test]
  fn headerless_grids_warn_and_import_from_row_one() {
    let grid = vec![
      vec![Cell::Text("alpha".to_string()), Cell::Text("beta".to_string())],
      vec![Cell::Text("gamma".to_string()), Cell::Number(3.0)],
    ];
    let result = normalize_grid(grid).expect("normalize");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.transactions.len(), 1);
    // No mapped columns: everything falls back to defaults.
    let txn = &result.transactions[0];
    assert_eq!(txn.item_name, DEFAULT_ITEM_NAME);
    assert_eq!(txn.quantity, 0.0);
  }

  #[test]
  fn delimited_files_import_end_to_end() {
    let input = b"Date,Bill No,Veh No,Qty,Rate,Amt\n2024-03-05,201,tn01x9,50,92,4600\n";
    let result = parse_file("march.csv", input).expect("parse");
    assert_eq!(result.transactions.len(), 1);
    let txn = &result.transactions[0];
    assert_eq!(txn.bill_no, "201");
    assert_eq!(txn.vehicle_no, "TN01X9");
    assert_eq!(txn.amount, 4600.0);
  }

  #[test]
  fn import_errors_map_to_the_app_taxonomy() {
    let empty: AppError = ImportError::Empty.into();
    assert_eq!(empty.code, "IMPORT_EMPTY");
    let parse: AppError = ImportError::Parse("bad file".to_string()).into();
    assert_eq!(parse.code, "IMPORT_PARSE");
  }
}
