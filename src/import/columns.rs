use super::grid::{Cell, Grid};

/// Keywords used to score candidate header rows.
const HEADER_KEYWORDS: [&str; 12] = [
  "date", "bill", "veh", "truck", "indent", "item", "product", "qty", "quantity", "rate",
  "amount", "total",
];

const DATE_ALIASES: [&str; 2] = ["date", "dt"];
const BILL_ALIASES: [&str; 3] = ["bill", "inv", "ref"];
const VEHICLE_ALIASES: [&str; 4] = ["veh", "truck", "lorry", "reg"];
const INDENT_ALIASES: [&str; 2] = ["indent", "slip"];
const ITEM_ALIASES: [&str; 4] = ["item", "product", "part", "desc"];
const QUANTITY_ALIASES: [&str; 4] = ["qty", "quan", "ltr", "vol"];
const RATE_ALIASES: [&str; 3] = ["rate", "price", "unit"];
const AMOUNT_ALIASES: [&str; 4] = ["amt", "amount", "tot", "val"];

const HEADER_SCAN_LIMIT: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
  pub date: Option<usize>,
  pub bill_no: Option<usize>,
  pub vehicle_no: Option<usize>,
  pub indent: Option<usize>,
  pub item_name: Option<usize>,
  pub quantity: Option<usize>,
  pub rate: Option<usize>,
  pub amount: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct GridLayout {
  pub header_row: usize,
  pub columns: ColumnMap,
  /// False when no row scored any keyword and row 0 was assumed.
  pub header_matched: bool,
}

/// Pure layout detection: pick the highest-scoring row among the first ten
/// (earliest wins ties), then map each logical field to the first header cell
/// containing one of its aliases.
pub fn detect_layout(grid: &Grid) -> GridLayout {
  let mut header_row = 0;
  let mut best_score = 0;

  for (idx, row) in grid.iter().take(HEADER_SCAN_LIMIT).enumerate() {
    let score = row.iter().filter(|cell| scores_as_header(cell)).count();
    if score > best_score {
      best_score = score;
      header_row = idx;
    }
  }

  let headers: Vec<String> = grid
    .get(header_row)
    .map(|row| {
      row
        .iter()
        .map(|cell| cell.as_text().trim().to_lowercase())
        .collect()
    })
    .unwrap_or_default();

  let find = |aliases: &[&str]| {
    headers
      .iter()
      .position(|header| aliases.iter().any(|alias| header.contains(alias)))
  };

  GridLayout {
    header_row,
    columns: ColumnMap {
      date: find(&DATE_ALIASES),
      bill_no: find(&BILL_ALIASES),
      vehicle_no: find(&VEHICLE_ALIASES),
      indent: find(&INDENT_ALIASES),
      item_name: find(&ITEM_ALIASES),
      quantity: find(&QUANTITY_ALIASES),
      rate: find(&RATE_ALIASES),
      amount: find(&AMOUNT_ALIASES),
    },
    header_matched: best_score > 0,
  }
}

fn scores_as_header(cell: &Cell) -> bool {
  match cell {
    Cell::Text(text) => {
      let lowered = text.to_lowercase();
      HEADER_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
    }
    _ => false,
  }
}

#[cfg(test)]
mod tests {
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

  #[test]
  fn picks_the_highest_scoring_row() {
    let grid = vec![
      text_row(&["Fuel deliveries", "", ""]),
      text_row(&["Statement for March", "", ""]),
      text_row(&["Date", "Bill No", "Vehicle", "Qty", "Rate", "Amount"]),
      text_row(&["2024-03-01", "101", "KA 25", "100", "90", "9000"]),
    ];
    let layout = detect_layout(&grid);
    assert_eq!(layout.header_row, 2);
    assert!(layout.header_matched);
    assert_eq!(layout.columns.date, Some(0));
    assert_eq!(layout.columns.bill_no, Some(1));
    assert_eq!(layout.columns.vehicle_no, Some(2));
    assert_eq!(layout.columns.quantity, Some(3));
    assert_eq!(layout.columns.rate, Some(4));
    assert_eq!(layout.columns.amount, Some(5));
  }

  #[test]
  fn earliest_row_wins_ties() {
    let grid = vec![
      text_row(&["Date", "Qty"]),
      text_row(&["Date", "Qty"]),
    ];
    assert_eq!(detect_layout(&grid).header_row, 0);
  }

  #[test]
  fn falls_back_to_row_zero_when_nothing_scores() {
    let grid = vec![
      text_row(&["alpha", "beta"]),
      text_row(&["1", "2"]),
    ];
    let layout = detect_layout(&grid);
    assert_eq!(layout.header_row, 0);
    assert!(!layout.header_matched);
  }

  #[test]
  fn aliases_match_by_containment() {
    let grid = vec![text_row(&[
      "Delivery Dt",
      "Invoice",
      "Truck Reg",
      "Slip No",
      "Product Desc",
      "Volume (Ltr)",
      "Unit Price",
      "Total Value",
    ])];
    let layout = detect_layout(&grid);
    assert_eq!(layout.columns.date, Some(0));
    assert_eq!(layout.columns.bill_no, Some(1));
    assert_eq!(layout.columns.vehicle_no, Some(2));
    assert_eq!(layout.columns.indent, Some(3));
    assert_eq!(layout.columns.item_name, Some(4));
    assert_eq!(layout.columns.quantity, Some(5));
    assert_eq!(layout.columns.rate, Some(6));
    assert_eq!(layout.columns.amount, Some(7));
  }

  #[test]
  fn missing_columns_stay_unmapped() {
    let grid = vec![text_row(&["Date", "Amount"])];
    let layout = detect_layout(&grid);
    assert_eq!(layout.columns.vehicle_no, None);
    assert_eq!(layout.columns.indent, None);
    assert_eq!(layout.columns.rate, None);
  }

  #[test]
  fn numeric_cells_do_not_score() {
    let grid = vec![
      vec![Cell::Number(2024.0), Cell::Number(1.0)],
      text_row(&["Date", "Qty"]),
    ];
    let layout = detect_layout(&grid);
    assert_eq!(layout.header_row, 1);
  }
}
