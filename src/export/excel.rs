use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Color, ExcelDateTime, Format, FormatAlign, Workbook, Worksheet};

use crate::error::AppError;
use crate::statement::StatementDocument;

/// Excel rendition of the statement: one sheet mirroring the PDF layout.
pub fn render_excel(statement: &StatementDocument) -> Result<Vec<u8>, AppError> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet
    .set_name("STATEMENT")
    .map_err(|err| AppError::new("DOC_ERROR", err.to_string()))?;

  let title = Format::new().set_bold().set_font_size(16.0).set_align(FormatAlign::Center);
  let subtitle = Format::new().set_bold().set_align(FormatAlign::Center);
  let centered = Format::new().set_align(FormatAlign::Center);
  let banner = Format::new().set_bold().set_font_size(13.0).set_align(FormatAlign::Center);
  let label = Format::new().set_bold();
  let header = Format::new()
    .set_bold()
    .set_background_color(Color::RGB(0xE2E8F0))
    .set_align(FormatAlign::Center);
  let money = Format::new().set_num_format("#,##0.00");
  let money_bold = Format::new().set_bold().set_num_format("#,##0.00");
  let qty = Format::new().set_num_format("0.000");
  let date_format = Format::new().set_num_format("dd-mm-yyyy");

  let vendor = &statement.vendor;
  sheet.write_string_with_format(0, 0, &format!("Proprietor : {}", vendor.proprietor), &label)?;
  sheet.write_string_with_format(0, 6, &format!("CC Code: {}", vendor.cc_code), &label)?;
  sheet.merge_range(1, 0, 1, 6, &vendor.company_name.to_uppercase(), &title)?;
  sheet.merge_range(2, 0, 2, 6, &vendor.subtitle, &subtitle)?;
  sheet.merge_range(3, 0, 3, 6, &vendor.address_line1, &centered)?;
  sheet.merge_range(4, 0, 4, 6, &vendor.address_line2, &centered)?;
  sheet.merge_range(5, 0, 5, 6, "INVOICE CUM STATEMENT", &banner)?;

  sheet.write_string_with_format(7, 0, &format!("Party : {}", statement.client.party_name), &label)?;
  sheet.write_string_with_format(7, 5, &format!("Report Date : {}", statement.report_date), &label)?;
  sheet.write_string(8, 0, &statement.client.address_line1)?;
  sheet.write_string_with_format(
    8,
    5,
    &format!("Period : {} To {}", statement.from_date, statement.to_date),
    &label,
  )?;

  let header_row = 10;
  for (idx, text) in ["B.No", "Date", "Veh.No", "Indent", "Item", "Qty", "Amount"]
    .iter()
    .enumerate()
  {
    sheet.write_string_with_format(header_row, idx as u16, *text, &header)?;
  }

  let mut row = header_row + 1;
  sheet.write_string_with_format(row, 4, "Opening Balance", &label)?;
  sheet.write_number_with_format(row, 6, statement.opening_balance, &money_bold)?;
  row += 1;

  for line in &statement.rows {
    sheet.write_string(row, 0, &line.bill_no)?;
    write_date(sheet, row, 1, &line.date, &date_format)?;
    sheet.write_string(row, 2, &line.vehicle_no)?;
    sheet.write_string(row, 3, &line.indent)?;
    sheet.write_string(row, 4, &line.item_name)?;
    sheet.write_number_with_format(row, 5, line.quantity, &qty)?;
    sheet.write_number_with_format(row, 6, line.amount, &money)?;
    row += 1;
  }

  row += 1;
  sheet.write_string_with_format(row, 0, "Abstract:", &label)?;
  let mut abstract_row = row + 1;
  for line in &statement.abstract_lines {
    sheet.write_string(abstract_row, 0, &line.item_name)?;
    sheet.write_number_with_format(abstract_row, 1, line.quantity, &qty)?;
    abstract_row += 1;
  }

  let totals = &statement.totals;
  sheet.write_string(row, 4, "Sales Total")?;
  sheet.write_number_with_format(row, 6, totals.sales_total, &money)?;
  sheet.write_string_with_format(row + 1, 4, "Gross Total", &label)?;
  sheet.write_number_with_format(row + 1, 6, totals.gross_total, &money_bold)?;
  sheet.write_string(row + 2, 4, "Round Off")?;
  sheet.write_number_with_format(row + 2, 6, totals.round_off, &money)?;
  sheet.write_string_with_format(row + 3, 4, "Net Total", &label)?;
  sheet.write_number_with_format(row + 3, 6, totals.net_total, &money_bold)?;

  let mut bank_row = abstract_row.max(row + 5) + 1;
  sheet.write_string_with_format(bank_row, 0, "BANK DETAILS", &label)?;
  sheet.write_string_with_format(bank_row, 5, &format!("For {}", vendor.company_name), &label)?;
  bank_row += 1;
  sheet.write_string(bank_row, 0, &format!("A/C NO: {}", vendor.account_no))?;
  sheet.write_string(bank_row + 1, 0, &format!("A/C NAME: {}", vendor.account_name))?;
  sheet.write_string(bank_row + 2, 0, &format!("IFSC: {}", vendor.ifsc_code))?;
  sheet.write_string(bank_row + 3, 0, &format!("BANK: {}", vendor.bank_name))?;

  sheet.set_column_width(0, 10)?;
  sheet.set_column_width(1, 12)?;
  sheet.set_column_width(2, 16)?;
  sheet.set_column_width(3, 10)?;
  sheet.set_column_width(4, 26)?;
  sheet.set_column_width(5, 12)?;
  sheet.set_column_width(6, 16)?;
  sheet.set_freeze_panes(header_row + 1, 0)?;

  let bytes = workbook.save_to_buffer()?;
  Ok(bytes)
}

/// Statement rows carry display dates (DD-MM-YYYY); imported rows may hold
/// arbitrary text, which is written as a plain string instead.
fn write_date(
  sheet: &mut Worksheet,
  row: u32,
  col: u16,
  date: &str,
  format: &Format,
) -> Result<(), AppError> {
  match NaiveDate::parse_from_str(date, "%d-%m-%Y") {
    Ok(parsed) => {
      let year = u16::try_from(parsed.year())
        .map_err(|_| AppError::new("INVALID_DATE", "Date is out of range"))?;
      let cell = ExcelDateTime::from_ymd(year, parsed.month() as u8, parsed.day() as u8)
        .map_err(|err| AppError::new("DOC_ERROR", err.to_string()))?;
      sheet.write_datetime_with_format(row, col, &cell, format)?;
    }
    Err(_) => {
      sheet.write_string(row, col, date)?;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{ReportMeta, StateSnapshot, Transaction};
  use crate::statement::build_statement;

  #[test]
  fn renders_an_xlsx_workbook() {
    let state = StateSnapshot {
      meta: ReportMeta {
        opening_balance: "50".to_string(),
        ..ReportMeta::default()
      },
      transactions: vec![Transaction {
        id: "id-1".to_string(),
        bill_no: "101".to_string(),
        date: "2024-03-01".to_string(),
        vehicle_no: "KA25AB1234".to_string(),
        indent: "IND-4".to_string(),
        item_name: "DIESEL [HSD]".to_string(),
        quantity: 100.0,
        rate: 90.0,
        amount: 9000.0,
      }],
      ..StateSnapshot::default()
    };
    let doc = build_statement(&state).expect("build");
    let bytes = render_excel(&doc).expect("render");
    // xlsx files are zip containers.
    assert!(bytes.starts_with(b"PK"));
  }
}
