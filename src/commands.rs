use std::fs;

use base64::Engine;

use crate::domain::validation;
use crate::error::AppError;
use crate::export::{excel, pdf};
use crate::import;
use crate::models::{
  BulkRateInput, BulkUpdateSummary, ClientProfile, GeneratedFile, ImportSummary, ReportMeta,
  SmartFillInput, StateSnapshot, Transaction, TransactionDeleteInput, TransactionUpdateInput,
  VendorProfile,
};
use crate::statement;
use crate::AppState;

pub fn get_state(state: &AppState) -> Result<StateSnapshot, AppError> {
  state.store.snapshot()
}

pub fn update_vendor(state: &AppState, input: VendorProfile) -> Result<VendorProfile, AppError> {
  state.store.update_vendor(input)
}

pub fn update_client(state: &AppState, input: ClientProfile) -> Result<ClientProfile, AppError> {
  state.store.update_client(input)
}

pub fn update_meta(state: &AppState, input: ReportMeta) -> Result<ReportMeta, AppError> {
  validation::ensure_date_input(&input.report_date)?;
  validation::ensure_date_input(&input.from_date)?;
  validation::ensure_date_input(&input.to_date)?;
  validation::ensure_opening_balance(&input.opening_balance)?;
  state.store.update_meta(input)
}

pub fn add_transaction(state: &AppState) -> Result<Transaction, AppError> {
  state.store.add_transaction()
}

pub fn update_transaction(
  state: &AppState,
  input: TransactionUpdateInput,
) -> Result<Transaction, AppError> {
  if let Some(date) = input.patch.date.as_deref() {
    validation::ensure_date_input(date)?;
  }
  if let Some(quantity) = input.patch.quantity {
    validation::ensure_non_negative(quantity, "Quantity")?;
  }
  if let Some(rate) = input.patch.rate {
    validation::ensure_non_negative(rate, "Rate")?;
  }
  state.store.update_transaction(&input.id, input.patch)
}

pub fn delete_transaction(state: &AppState, input: TransactionDeleteInput) -> Result<(), AppError> {
  let id = input.id.trim();
  if id.is_empty() {
    return Err(AppError::new("INVALID_ID", "Transaction id is missing"));
  }
  state.store.delete_transaction(id)
}

pub fn apply_bulk_rate(state: &AppState, input: BulkRateInput) -> Result<BulkUpdateSummary, AppError> {
  validation::ensure_non_negative(input.rate, "Rate")?;
  let updated = state.store.apply_bulk_rate(input.rate)?;
  Ok(BulkUpdateSummary { updated })
}

pub fn apply_smart_bill_fill(
  state: &AppState,
  input: SmartFillInput,
) -> Result<BulkUpdateSummary, AppError> {
  let updated = state.store.apply_smart_bill_fill(&input.start_bill_no)?;
  Ok(BulkUpdateSummary { updated })
}

pub fn import_transactions(
  state: &AppState,
  file_name: &str,
  bytes: &[u8],
) -> Result<ImportSummary, AppError> {
  let result = import::parse_file(file_name, bytes)?;
  let imported = state.store.import_transactions(result.transactions)?;
  Ok(ImportSummary {
    imported,
    warnings: result.warnings,
  })
}

pub fn generate_statement_pdf(state: &AppState) -> Result<GeneratedFile, AppError> {
  let snapshot = state.store.snapshot()?;
  let document = statement::build_statement(&snapshot)?;
  let bytes = pdf::render_pdf(&document)?;
  write_export(state, &document.file_stem, "pdf", "application/pdf", bytes)
}

pub fn generate_statement_excel(state: &AppState) -> Result<GeneratedFile, AppError> {
  let snapshot = state.store.snapshot()?;
  let document = statement::build_statement(&snapshot)?;
  let bytes = excel::render_excel(&document)?;
  write_export(
    state,
    &document.file_stem,
    "xlsx",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    bytes,
  )
}

pub fn reset_all(state: &AppState) -> Result<(), AppError> {
  state.store.reset_all()
}

fn write_export(
  state: &AppState,
  file_stem: &str,
  extension: &str,
  content_type: &str,
  bytes: Vec<u8>,
) -> Result<GeneratedFile, AppError> {
  let export_dir = state.app_dir.join("Exports");
  fs::create_dir_all(&export_dir)?;

  let file_name = format!("{file_stem}.{extension}");
  let path = export_dir.join(&file_name);
  if let Err(err) = fs::write(&path, &bytes) {
    let _ = fs::remove_file(&path);
    return Err(err.into());
  }

  Ok(GeneratedFile {
    file_name,
    content_type: content_type.to_string(),
    data_base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
    saved_path: path.to_string_lossy().to_string(),
  })
}
