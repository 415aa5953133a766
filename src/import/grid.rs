use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::ImportError;

/// One cell of the raw input grid, before any field mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Empty,
  Text(String),
  Number(f64),
  Bool(bool),
}

impl Cell {
  /// Empty cells, blank text, zero and false all count as "nothing here";
  /// a row made only of these is skipped during normalization.
  pub fn is_falsy(&self) -> bool {
    match self {
      Cell::Empty => true,
      Cell::Text(text) => text.trim().is_empty(),
      Cell::Number(value) => *value == 0.0,
      Cell::Bool(value) => !*value,
    }
  }

  pub fn as_text(&self) -> String {
    match self {
      Cell::Empty => String::new(),
      Cell::Text(text) => text.clone(),
      Cell::Number(value) => {
        if value.fract() == 0.0 && value.abs() < 1e15 {
          format!("{}", *value as i64)
        } else {
          format!("{value}")
        }
      }
      Cell::Bool(value) => value.to_string(),
    }
  }

  pub fn as_number(&self) -> Option<f64> {
    match self {
      Cell::Empty => None,
      Cell::Text(text) => text.trim().parse().ok(),
      Cell::Number(value) => Some(*value),
      Cell::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
    }
  }
}

pub type Grid = Vec<Vec<Cell>>;

/// Reads the first sheet of an xlsx/xls/ods workbook into a grid.
pub fn read_spreadsheet(bytes: &[u8]) -> Result<Grid, ImportError> {
  let cursor = Cursor::new(bytes.to_vec());
  let mut workbook =
    open_workbook_auto_from_rs(cursor).map_err(|err| ImportError::Parse(err.to_string()))?;
  let range = workbook
    .worksheet_range_at(0)
    .ok_or(ImportError::NoSheet)?
    .map_err(|err| ImportError::Parse(err.to_string()))?;

  Ok(
    range
      .rows()
      .map(|row| row.iter().map(cell_from_data).collect())
      .collect(),
  )
}

fn cell_from_data(data: &Data) -> Cell {
  match data {
    Data::Empty => Cell::Empty,
    Data::String(text) => Cell::Text(text.clone()),
    Data::Float(value) => Cell::Number(*value),
    Data::Int(value) => Cell::Number(*value as f64),
    Data::Bool(value) => Cell::Bool(*value),
    Data::DateTime(value) => Cell::Number(value.as_f64()),
    Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
    Data::Error(err) => Cell::Text(err.to_string()),
  }
}

/// Reads delimited text into a grid. Numeric-looking cells become numbers,
/// which keeps the downstream field mapping identical for both file kinds.
pub fn read_delimited(bytes: &[u8]) -> Result<Grid, ImportError> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .from_reader(bytes);

  let mut grid = Grid::new();
  for record in reader.records() {
    let record = record?;
    grid.push(record.iter().map(cell_from_text).collect());
  }
  Ok(grid)
}

fn cell_from_text(raw: &str) -> Cell {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Cell::Empty;
  }
  match trimmed.parse::<f64>() {
    Ok(value) => Cell::Number(value),
    Err(_) => Cell::Text(raw.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn delimited_text_becomes_a_typed_grid() {
    let input = b"Date,Qty,Vehicle\n2024-01-05,120.5,ka25ab1234\n,,\n";
    let grid = read_delimited(input).expect("read csv");
    assert_eq!(grid.len(), 3);
    assert_eq!(grid[0][0], Cell::Text("Date".to_string()));
    assert_eq!(grid[1][1], Cell::Number(120.5));
    assert_eq!(grid[1][2], Cell::Text("ka25ab1234".to_string()));
    assert!(grid[2].iter().all(Cell::is_falsy));
  }

  #[test]
  fn falsy_covers_empty_zero_and_blank() {
    assert!(Cell::Empty.is_falsy());
    assert!(Cell::Number(0.0).is_falsy());
    assert!(Cell::Text("  ".to_string()).is_falsy());
    assert!(Cell::Bool(false).is_falsy());
    assert!(!Cell::Number(1.0).is_falsy());
    assert!(!Cell::Text("x".to_string()).is_falsy());
  }

  #[test]
  fn integral_numbers_render_without_decimals() {
    assert_eq!(Cell::Number(42.0).as_text(), "42");
    assert_eq!(Cell::Number(42.5).as_text(), "42.5");
    assert_eq!(Cell::Empty.as_text(), "");
  }

  #[test]
  fn number_coercion_parses_text() {
    assert_eq!(Cell::Text(" 12.5 ".to_string()).as_number(), Some(12.5));
    assert_eq!(Cell::Text("n/a".to_string()).as_number(), None);
    assert_eq!(Cell::Empty.as_number(), None);
  }
}
