use std::io::BufWriter;

use printpdf::{
  BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
  PdfLayerReference, PdfPageIndex, Point,
};

use crate::domain::money::{format_amount, format_quantity};
use crate::error::AppError;
use crate::statement::StatementDocument;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_RIGHT: f32 = 195.0;
const BOTTOM_LIMIT: f32 = 30.0;
const CONTINUATION_TOP: f32 = 280.0;

const COL_BILL: f32 = 15.0;
const COL_DATE: f32 = 33.0;
const COL_VEHICLE: f32 = 60.0;
const COL_INDENT: f32 = 90.0;
const COL_ITEM: f32 = 108.0;
const COL_QTY_RIGHT: f32 = 165.0;
const COL_AMOUNT_RIGHT: f32 = 195.0;

const PT_TO_MM: f32 = 0.352_778;

pub fn render_pdf(statement: &StatementDocument) -> Result<Vec<u8>, AppError> {
  let (doc, first_page, first_layer) = PdfDocument::new(
    "Invoice cum Statement",
    Mm(PAGE_WIDTH),
    Mm(PAGE_HEIGHT),
    "Layer 1",
  );
  let font = doc
    .add_builtin_font(BuiltinFont::Helvetica)
    .map_err(doc_error)?;
  let font_bold = doc
    .add_builtin_font(BuiltinFont::HelveticaBold)
    .map_err(doc_error)?;

  let mut writer = PageWriter {
    doc: &doc,
    font,
    font_bold,
    pages: vec![(first_page, first_layer)],
    y: 285.0,
  };

  draw_header(&mut writer, statement);
  draw_table(&mut writer, statement);
  draw_footer_blocks(&mut writer, statement);
  draw_page_numbers(&writer);

  let mut buffer = BufWriter::new(Vec::new());
  doc.save(&mut buffer).map_err(doc_error)?;
  buffer
    .into_inner()
    .map_err(|err| AppError::new("DOC_ERROR", err.to_string()))
}

fn doc_error(err: impl std::fmt::Display) -> AppError {
  AppError::new("DOC_ERROR", err.to_string())
}

struct PageWriter<'a> {
  doc: &'a PdfDocumentReference,
  font: IndirectFontRef,
  font_bold: IndirectFontRef,
  pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
  y: f32,
}

impl PageWriter<'_> {
  fn layer(&self) -> PdfLayerReference {
    let (page, layer) = self.pages[self.pages.len() - 1];
    self.doc.get_page(page).get_layer(layer)
  }

  fn new_page(&mut self) {
    let (page, layer) = self
      .doc
      .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    self.pages.push((page, layer));
    self.y = CONTINUATION_TOP;
  }

  fn text(&self, content: &str, size: f32, x: f32, y: f32, bold: bool) {
    let font = if bold { &self.font_bold } else { &self.font };
    self.layer().use_text(content, size, Mm(x), Mm(y), font);
  }

  fn text_right(&self, content: &str, size: f32, right_x: f32, y: f32, bold: bool) {
    self.text(content, size, right_x - text_width(content, size), y, bold);
  }

  fn text_centered(&self, content: &str, size: f32, y: f32, bold: bool) {
    let x = (PAGE_WIDTH - text_width(content, size)) / 2.0;
    self.text(content, size, x, y, bold);
  }

  fn divider(&self, from_x: f32, to_x: f32, y: f32) {
    self.layer().add_line(Line {
      points: vec![
        (Point::new(Mm(from_x), Mm(y)), false),
        (Point::new(Mm(to_x), Mm(y)), false),
      ],
      is_closed: false,
    });
  }
}

// Helvetica metrics are not exposed for builtin fonts; an average glyph
// width is close enough for centering and right alignment at these sizes.
fn text_width(content: &str, size: f32) -> f32 {
  content.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

fn draw_header(writer: &mut PageWriter, statement: &StatementDocument) {
  let vendor = &statement.vendor;

  writer.text(&format!("Proprietor : {}", vendor.proprietor), 10.0, MARGIN_LEFT, writer.y, true);
  writer.text_right(&format!("CC Code: {}", vendor.cc_code), 10.0, MARGIN_RIGHT, writer.y, true);

  writer.y -= 8.0;
  writer.text_centered(&vendor.company_name.to_uppercase(), 16.0, writer.y, true);
  writer.y -= 6.0;
  writer.text_centered(&vendor.subtitle, 11.0, writer.y, true);
  writer.y -= 5.0;
  writer.text_centered(&vendor.address_line1, 9.0, writer.y, false);
  writer.y -= 4.0;
  writer.text_centered(&vendor.address_line2, 9.0, writer.y, false);

  writer.y -= 8.0;
  let banner = "INVOICE CUM STATEMENT";
  writer.text_centered(banner, 13.0, writer.y, true);
  let half = text_width(banner, 13.0) / 2.0;
  writer.divider(PAGE_WIDTH / 2.0 - half, PAGE_WIDTH / 2.0 + half, writer.y - 1.5);

  writer.y -= 9.0;
  writer.text(&format!("Party : {}", statement.client.party_name), 10.0, MARGIN_LEFT, writer.y, true);
  writer.text_right(&format!("Report Date : {}", statement.report_date), 10.0, MARGIN_RIGHT, writer.y, true);
  writer.y -= 5.0;
  if !statement.client.address_line1.trim().is_empty() {
    writer.text(&statement.client.address_line1, 9.0, MARGIN_LEFT, writer.y, false);
  }
  writer.text_right(
    &format!("Period : {} To {}", statement.from_date, statement.to_date),
    10.0,
    MARGIN_RIGHT,
    writer.y,
    true,
  );
  writer.y -= 8.0;
}

fn draw_table_header(writer: &mut PageWriter) {
  writer.divider(MARGIN_LEFT, MARGIN_RIGHT, writer.y + 4.0);
  writer.text("B.No", 9.0, COL_BILL, writer.y, true);
  writer.text("Date", 9.0, COL_DATE, writer.y, true);
  writer.text("Veh.No", 9.0, COL_VEHICLE, writer.y, true);
  writer.text("Indent", 9.0, COL_INDENT, writer.y, true);
  writer.text("Item", 9.0, COL_ITEM, writer.y, true);
  writer.text_right("Qty", 9.0, COL_QTY_RIGHT, writer.y, true);
  writer.text_right("Amount", 9.0, COL_AMOUNT_RIGHT, writer.y, true);
  writer.divider(MARGIN_LEFT, MARGIN_RIGHT, writer.y - 2.0);
  writer.y -= 7.0;
}

fn draw_table(writer: &mut PageWriter, statement: &StatementDocument) {
  draw_table_header(writer);

  writer.text_right("Opening Balance", 9.0, COL_QTY_RIGHT, writer.y, true);
  writer.text_right(
    &format_amount(statement.opening_balance),
    9.0,
    COL_AMOUNT_RIGHT,
    writer.y,
    true,
  );
  writer.y -= 5.5;

  for row in &statement.rows {
    if writer.y < BOTTOM_LIMIT {
      writer.new_page();
      draw_table_header(writer);
    }
    writer.text(&row.bill_no, 9.0, COL_BILL, writer.y, false);
    writer.text(&row.date, 9.0, COL_DATE, writer.y, false);
    writer.text(&row.vehicle_no, 9.0, COL_VEHICLE, writer.y, false);
    writer.text(&row.indent, 9.0, COL_INDENT, writer.y, false);
    writer.text(&row.item_name, 9.0, COL_ITEM, writer.y, false);
    writer.text_right(&format_quantity(row.quantity), 9.0, COL_QTY_RIGHT, writer.y, false);
    writer.text_right(&format_amount(row.amount), 9.0, COL_AMOUNT_RIGHT, writer.y, false);
    writer.y -= 5.5;
  }

  writer.divider(MARGIN_LEFT, MARGIN_RIGHT, writer.y + 3.0);
}

fn draw_footer_blocks(writer: &mut PageWriter, statement: &StatementDocument) {
  let abstract_height = 8.0 + statement.abstract_lines.len() as f32 * 5.0;
  let needed = abstract_height.max(34.0) + 32.0;
  if writer.y < BOTTOM_LIMIT + needed {
    writer.new_page();
  }

  writer.y -= 8.0;
  let block_top = writer.y;

  writer.text("Abstract:", 10.0, MARGIN_LEFT, writer.y, true);
  let mut abstract_y = writer.y - 6.0;
  for line in &statement.abstract_lines {
    writer.text(&format!("- {}", line.item_name), 9.0, MARGIN_LEFT + 2.0, abstract_y, false);
    writer.text(&format!("{:.3}", line.quantity), 9.0, 70.0, abstract_y, true);
    abstract_y -= 5.0;
  }

  let totals = &statement.totals;
  let label_x = 120.0;
  let mut totals_y = block_top;
  writer.divider(label_x, MARGIN_RIGHT, totals_y + 4.0);
  writer.text("Sales Total", 10.0, label_x, totals_y, false);
  writer.text_right(&format_amount(totals.sales_total), 10.0, COL_AMOUNT_RIGHT, totals_y, false);
  totals_y -= 6.0;
  writer.text("Gross Total", 10.0, label_x, totals_y, true);
  writer.text_right(&format_amount(totals.gross_total), 10.0, COL_AMOUNT_RIGHT, totals_y, true);
  totals_y -= 6.0;
  writer.text("Round Off", 9.0, label_x, totals_y, false);
  writer.text_right(&format!("{:.2}", totals.round_off), 9.0, COL_AMOUNT_RIGHT, totals_y, false);
  totals_y -= 3.0;
  writer.divider(label_x, MARGIN_RIGHT, totals_y);
  totals_y -= 6.0;
  writer.text("Net Total", 12.0, label_x, totals_y, true);
  writer.text_right(&format_amount(totals.net_total), 12.0, COL_AMOUNT_RIGHT, totals_y, true);

  writer.y = (writer.y - abstract_height).min(totals_y) - 14.0;

  let vendor = &statement.vendor;
  writer.text("BANK DETAILS", 9.0, MARGIN_LEFT, writer.y, true);
  writer.divider(MARGIN_LEFT, MARGIN_LEFT + text_width("BANK DETAILS", 9.0), writer.y - 1.2);
  writer.text_right(&format!("For {}", vendor.company_name), 10.0, MARGIN_RIGHT, writer.y, true);
  writer.y -= 5.0;
  writer.text(&format!("A/C NO: {}", vendor.account_no), 9.0, MARGIN_LEFT, writer.y, true);
  writer.y -= 4.5;
  writer.text(&format!("A/C NAME: {}", vendor.account_name), 9.0, MARGIN_LEFT, writer.y, true);
  writer.y -= 4.5;
  writer.text(&format!("IFSC: {}", vendor.ifsc_code), 9.0, MARGIN_LEFT, writer.y, true);
  writer.y -= 4.5;
  writer.text(&format!("BANK: {}", vendor.bank_name), 9.0, MARGIN_LEFT, writer.y, true);
}

fn draw_page_numbers(writer: &PageWriter) {
  let total = writer.pages.len();
  for (idx, (page, layer)) in writer.pages.iter().enumerate() {
    let layer = writer.doc.get_page(*page).get_layer(*layer);
    let label = format!("Page {} of {}", idx + 1, total);
    let x = MARGIN_RIGHT - text_width(&label, 8.0);
    layer.use_text(label, 8.0, Mm(x), Mm(10.0), &writer.font);
  }
}
