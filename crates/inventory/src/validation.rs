//! Input checks applied before a store operation is attempted.

use gearlog_core::{DomainError, DomainResult};

/// Trimmed `value`, or a validation error naming `field` when blank.
pub fn require_non_blank<'a>(field: &str, value: &'a str) -> DomainResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// A purchase price may be left empty; otherwise it must be a non-negative number.
pub fn check_purchase_price(value: &str) -> DomainResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match trimmed.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(()),
        _ => Err(DomainError::validation(
            "purchase price must be a non-negative number",
        )),
    }
}
