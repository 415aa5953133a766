use chrono::NaiveDate;

use crate::error::AppError;

pub fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
  let year_len = date.split('-').next().map(str::len).unwrap_or(0);
  if year_len != 4 {
    return Err(AppError::new("INVALID_DATE", "Date must be YYYY-MM-DD"));
  }
  NaiveDate::parse_from_str(date, "%Y-%m-%d")
    .map_err(|_| AppError::new("INVALID_DATE", "Date must be YYYY-MM-DD"))
}

/// Date fields may be cleared in the UI; anything non-empty must be ISO.
pub fn ensure_date_input(date: &str) -> Result<(), AppError> {
  if date.is_empty() {
    return Ok(());
  }
  parse_date(date).map(|_| ())
}

/// The opening balance is kept as the raw text the user typed and coerced
/// for computation. Unparseable text counts as zero.
pub fn parse_opening_balance(raw: &str) -> f64 {
  raw.trim().parse::<f64>().unwrap_or(0.0)
}

pub fn ensure_opening_balance(raw: &str) -> Result<f64, AppError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(0.0);
  }
  let value: f64 = trimmed
    .parse()
    .map_err(|_| AppError::new("INVALID_AMOUNT", "Opening balance must be a number"))?;
  if value < 0.0 {
    return Err(AppError::new("INVALID_AMOUNT", "Opening balance must not be negative"));
  }
  Ok(value)
}

pub fn ensure_non_negative(value: f64, label: &str) -> Result<(), AppError> {
  if !value.is_finite() || value < 0.0 {
    Err(AppError::new("INVALID_AMOUNT", format!("{label} must be 0 or more")))
  } else {
    Ok(())
  }
}
