use crate::domain::money::{self, StatementTotals};
use crate::domain::validation;
use crate::error::AppError;
use crate::models::{today_iso, ClientProfile, StateSnapshot, VendorProfile};

/// Print-ready description of the statement, shared by the PDF and Excel
/// renderers. Dates are already display-formatted; the stored state is
/// untouched.
#[derive(Debug, Clone)]
pub struct StatementDocument {
  pub vendor: VendorProfile,
  pub client: ClientProfile,
  pub report_date: String,
  pub from_date: String,
  pub to_date: String,
  pub opening_balance: f64,
  pub rows: Vec<StatementRow>,
  pub abstract_lines: Vec<AbstractLine>,
  pub totals: StatementTotals,
  pub file_stem: String,
}

#[derive(Debug, Clone)]
pub struct StatementRow {
  pub bill_no: String,
  pub date: String,
  pub vehicle_no: String,
  pub indent: String,
  pub item_name: String,
  pub quantity: f64,
  pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct AbstractLine {
  pub item_name: String,
  pub quantity: f64,
}

pub fn build_statement(state: &StateSnapshot) -> Result<StatementDocument, AppError> {
  if state.transactions.is_empty() {
    return Err(AppError::new("DOC_EMPTY", "No transactions to print"));
  }

  let opening_balance = validation::parse_opening_balance(&state.meta.opening_balance);
  let totals = money::statement_totals(opening_balance, &state.transactions);

  let rows = state
    .transactions
    .iter()
    .map(|txn| StatementRow {
      bill_no: txn.bill_no.clone(),
      date: display_date(&txn.date),
      vehicle_no: txn.vehicle_no.clone(),
      indent: txn.indent.clone(),
      item_name: txn.item_name.clone(),
      quantity: txn.quantity,
      amount: txn.amount,
    })
    .collect();

  let abstract_lines = money::quantity_abstract(&state.transactions)
    .into_iter()
    .map(|(item_name, quantity)| AbstractLine {
      item_name,
      quantity,
    })
    .collect();

  Ok(StatementDocument {
    vendor: state.vendor.clone(),
    client: state.client.clone(),
    report_date: display_date(&state.meta.report_date),
    from_date: display_date(&state.meta.from_date),
    to_date: display_date(&state.meta.to_date),
    opening_balance,
    rows,
    abstract_lines,
    totals,
    file_stem: file_stem(&state.client.party_name, &state.meta.report_date),
  })
}

/// ISO dates display as DD-MM-YYYY; anything else passes through unchanged.
pub fn display_date(value: &str) -> String {
  let parts: Vec<&str> = value.split('-').collect();
  if parts.len() == 3 {
    format!("{}-{}-{}", parts[2], parts[1], parts[0])
  } else {
    value.to_string()
  }
}

/// `Statement_<PARTYNAME>_<reportDate>`, both pieces sanitized for a file
/// name the way the download always named them.
pub fn file_stem(party_name: &str, report_date: &str) -> String {
  let party = if party_name.trim().is_empty() {
    "Client".to_string()
  } else {
    party_name.to_string()
  };
  let safe_party: String = party
    .chars()
    .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
    .collect::<String>()
    .to_uppercase();

  let date = if report_date.trim().is_empty() {
    today_iso()
  } else {
    report_date.to_string()
  };
  let safe_date: String = date
    .chars()
    .map(|ch| {
      if ch.is_ascii_alphanumeric() || ch == '-' {
        ch
      } else {
        '_'
      }
    })
    .collect();

  format!("Statement_{safe_party}_{safe_date}")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{ReportMeta, Transaction};

  fn txn(amount: f64) -> Transaction {
    Transaction {
      id: format!("id-{amount}"),
      bill_no: "101".to_string(),
      date: "2024-03-01".to_string(),
      vehicle_no: "KA25AB1234".to_string(),
      indent: String::new(),
      item_name: "DIESEL [HSD]".to_string(),
      quantity: 10.0,
      rate: amount / 10.0,
      amount,
    }
  }

  fn snapshot(transactions: Vec<Transaction>) -> StateSnapshot {
    StateSnapshot {
      meta: ReportMeta {
        report_date: "2024-03-31".to_string(),
        from_date: "2024-03-01".to_string(),
        to_date: "2024-03-31".to_string(),
        opening_balance: "50".to_string(),
      },
      transactions,
      ..StateSnapshot::default()
    }
  }

  #[test]
  fn empty_transaction_lists_are_rejected() {
    let error = build_statement(&snapshot(Vec::new())).unwrap_err();
    assert_eq!(error.code, "DOC_EMPTY");
  }

  #[test]
  fn totals_and_display_dates_are_derived() {
    let doc = build_statement(&snapshot(vec![txn(100.0), txn(250.50)])).expect("build");
    assert_eq!(doc.totals.sales_total, 350.50);
    assert_eq!(doc.totals.gross_total, 400.50);
    assert_eq!(doc.totals.net_total, 401.0);
    assert_eq!(doc.report_date, "31-03-2024");
    assert_eq!(doc.rows[0].date, "01-03-2024");
    assert_eq!(doc.rows.len(), 2);
    assert_eq!(doc.abstract_lines.len(), 1);
    assert_eq!(doc.abstract_lines[0].quantity, 20.0);
  }

  #[test]
  fn non_iso_dates_pass_through() {
    assert_eq!(display_date("5/3/2024"), "5/3/2024");
    assert_eq!(display_date(""), "");
    assert_eq!(display_date("2024-03-05"), "05-03-2024");
  }

  #[test]
  fn file_stem_is_sanitized() {
    assert_eq!(
      file_stem("Thiruchendur Murugan Transport", "2024-03-31"),
      "Statement_THIRUCHENDUR_MURUGAN_TRANSPORT_2024-03-31"
    );
    assert_eq!(
      file_stem("A.B & Sons", "31/03/2024"),
      "Statement_A_B___SONS_31_03_2024"
    );
    assert!(file_stem("", "2024-03-31").starts_with("Statement_CLIENT_"));
  }

  #[test]
  fn file_stem_defaults_the_report_date() {
    let stem = file_stem("X", " ");
    assert!(stem.starts_with("Statement_X_"));
    assert!(stem.len() > "Statement_X_".len());
  }
}
