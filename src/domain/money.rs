use crate::models::Transaction;

#[derive(Debug, Clone, PartialEq)]
pub struct StatementTotals {
  pub sales_total: f64,
  pub gross_total: f64,
  pub net_total: f64,
  pub round_off: f64,
}

/// Rounds to the nearest whole unit, ties going up.
pub fn round_half_up(value: f64) -> f64 {
  (value + 0.5).floor()
}

pub fn statement_totals(opening_balance: f64, transactions: &[Transaction]) -> StatementTotals {
  let sales_total: f64 = transactions.iter().map(|t| t.amount).sum();
  let gross_total = opening_balance + sales_total;
  let net_total = round_half_up(gross_total);
  StatementTotals {
    sales_total,
    gross_total,
    net_total,
    round_off: net_total - gross_total,
  }
}

/// Sums quantity per item name, in order of first occurrence.
pub fn quantity_abstract(transactions: &[Transaction]) -> Vec<(String, f64)> {
  let mut lines: Vec<(String, f64)> = Vec::new();
  for txn in transactions {
    let name = if txn.item_name.trim().is_empty() {
      "Item".to_string()
    } else {
      txn.item_name.clone()
    };
    if let Some(entry) = lines.iter_mut().find(|(existing, _)| *existing == name) {
      entry.1 += txn.quantity;
    } else {
      lines.push((name, txn.quantity));
    }
  }
  lines
}

/// Formats an amount with two decimals and Indian digit grouping
/// (1,23,456.00).
pub fn format_amount(value: f64) -> String {
  let formatted = format!("{:.2}", value.abs());
  let (int_part, dec_part) = formatted
    .split_once('.')
    .unwrap_or((formatted.as_str(), "00"));

  let digits: Vec<char> = int_part.chars().collect();
  let len = digits.len();
  let mut grouped = String::with_capacity(len + len / 2);
  for (idx, ch) in digits.iter().enumerate() {
    grouped.push(*ch);
    let remaining = len - idx - 1;
    if remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0) {
      grouped.push(',');
    }
  }

  let sign = if value < 0.0 { "-" } else { "" };
  format!("{sign}{grouped}.{dec_part}")
}

/// Quantities print without a forced decimal tail, matching the on-screen
/// table (50 stays "50", 50.25 stays "50.25").
pub fn format_quantity(value: f64) -> String {
  if value.fract() == 0.0 && value.abs() < 1e15 {
    format!("{}", value as i64)
  } else {
    format!("{value}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn txn(item_name: &str, quantity: f64, amount: f64) -> Transaction {
    Transaction {
      id: format!("t-{item_name}-{quantity}"),
      bill_no: String::new(),
      date: "2024-01-01".to_string(),
      vehicle_no: String::new(),
      indent: String::new(),
      item_name: item_name.to_string(),
      quantity,
      rate: 0.0,
      amount,
    }
  }

  #[test]
  fn totals_round_half_up_at_the_boundary() {
    let txns = vec![txn("DIESEL [HSD]", 10.0, 100.0), txn("DIESEL [HSD]", 25.0, 250.50)];
    let totals = statement_totals(50.0, &txns);
    assert_eq!(totals.sales_total, 350.50);
    assert_eq!(totals.gross_total, 400.50);
    assert_eq!(totals.net_total, 401.0);
    assert!((totals.round_off - 0.50).abs() < 1e-9);
  }

  #[test]
  fn round_half_up_cases() {
    assert_eq!(round_half_up(400.49), 400.0);
    assert_eq!(round_half_up(400.50), 401.0);
    assert_eq!(round_half_up(401.0), 401.0);
    assert_eq!(round_half_up(0.0), 0.0);
  }

  #[test]
  fn abstract_groups_in_first_occurrence_order() {
    let txns = vec![
      txn("DIESEL [HSD]", 100.0, 0.0),
      txn("PETROL", 20.0, 0.0),
      txn("DIESEL [HSD]", 50.0, 0.0),
    ];
    let lines = quantity_abstract(&txns);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], ("DIESEL [HSD]".to_string(), 150.0));
    assert_eq!(lines[1], ("PETROL".to_string(), 20.0));
  }

  #[test]
  fn abstract_defaults_blank_item_names() {
    let lines = quantity_abstract(&[txn("", 5.0, 0.0), txn("  ", 3.0, 0.0)]);
    assert_eq!(lines, vec![("Item".to_string(), 8.0)]);
  }

  #[test]
  fn indian_digit_grouping() {
    assert_eq!(format_amount(0.0), "0.00");
    assert_eq!(format_amount(999.0), "999.00");
    assert_eq!(format_amount(1234.0), "1,234.00");
    assert_eq!(format_amount(123456.5), "1,23,456.50");
    assert_eq!(format_amount(12345678.0), "1,23,45,678.00");
    assert_eq!(format_amount(-1234.5), "-1,234.50");
  }

  #[test]
  fn quantity_formatting() {
    assert_eq!(format_quantity(50.0), "50");
    assert_eq!(format_quantity(50.25), "50.25");
    assert_eq!(format_quantity(0.0), "0");
  }
}
