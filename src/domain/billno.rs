/// Splits a bill number into an alphabetic prefix and a numeric suffix.
/// Anything that is not `letters-then-digits` is rejected.
pub fn split_bill_no(reference: &str) -> Option<(&str, &str)> {
  let prefix_len = reference
    .bytes()
    .take_while(|b| b.is_ascii_alphabetic())
    .count();
  let digits = &reference[prefix_len..];
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  Some((&reference[..prefix_len], digits))
}

/// Increments the numeric suffix of a bill number by `offset`, keeping the
/// prefix and zero-padding to the reference's digit width. The width is never
/// shrunk, so crossing a power-of-ten boundary simply produces a wider number.
/// A reference without a usable numeric part is returned unchanged.
pub fn increment_bill_no(reference: &str, offset: i64) -> String {
  if let Some((prefix, digits)) = split_bill_no(reference) {
    if let Ok(value) = digits.parse::<i64>() {
      return format!("{}{:0width$}", prefix, value + offset, width = digits.len());
    }
  }
  match reference.trim().parse::<i64>() {
    Ok(value) => (value + offset).to_string(),
    Err(_) => reference.to_string(),
  }
}

pub fn next_bill_no(reference: &str) -> String {
  increment_bill_no(reference, 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn increments_and_keeps_padding() {
    assert_eq!(increment_bill_no("AB007", 1), "AB008");
    assert_eq!(increment_bill_no("007", 1), "008");
    assert_eq!(increment_bill_no("INV099", 5), "INV104");
  }

  #[test]
  fn width_grows_past_power_of_ten() {
    assert_eq!(increment_bill_no("AB999", 1), "AB1000");
    assert_eq!(increment_bill_no("99", 1), "100");
  }

  #[test]
  fn plain_numbers_increment_without_padding() {
    assert_eq!(increment_bill_no("7", 1), "8");
    assert_eq!(next_bill_no("41"), "42");
  }

  #[test]
  fn unusable_references_are_returned_unchanged() {
    assert_eq!(increment_bill_no("B-12A", 1), "B-12A");
    assert_eq!(increment_bill_no("CASH", 3), "CASH");
    assert_eq!(increment_bill_no("", 1), "");
  }

  #[test]
  fn split_rejects_trailing_letters() {
    assert!(split_bill_no("AB12X").is_none());
    assert_eq!(split_bill_no("AB012"), Some(("AB", "012")));
    assert_eq!(split_bill_no("450"), Some(("", "450")));
  }
}
