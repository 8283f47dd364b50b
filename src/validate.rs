//! Per-field checks. Each function looks at one field in isolation; `normalize` runs all of them
//! and collects the failures.

use crate::error::{ErrorKind, Field, ValidationError};
use crate::model::{Amount, CategoryRegistry, ExpenseDate};
use std::str::FromStr;

/// Requires a present, non-blank value and returns it trimmed. A missing key and an empty string
/// are the same failure.
pub fn validate_text(value: Option<&str>, field: Field) -> Result<&str, ValidationError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed),
        _ => Err(ValidationError::missing(field)),
    }
}

/// Parses a `DD-MM-YYYY` calendar date.
pub fn validate_date(value: &str) -> Result<ExpenseDate, ValidationError> {
    ExpenseDate::from_str(value)
        .map_err(|e| ValidationError::new(Field::Date, ErrorKind::InvalidDateFormat, e.to_string()))
}

/// Parses a decimal amount and rejects values below zero. Zero itself is allowed.
pub fn validate_amount(value: &str) -> Result<Amount, ValidationError> {
    let amount = Amount::from_str(value).map_err(|e| {
        ValidationError::new(
            Field::Amount,
            ErrorKind::InvalidAmount,
            format!("Invalid amount: {e}"),
        )
    })?;
    if amount.is_negative() {
        return Err(ValidationError::new(
            Field::Amount,
            ErrorKind::NegativeAmount,
            format!("The amount must not be negative, got '{}'", value.trim()),
        ));
    }
    Ok(amount)
}

/// Requires the category to be one of the registry's labels.
pub fn validate_category<'a>(
    value: &'a str,
    registry: &dyn CategoryRegistry,
) -> Result<&'a str, ValidationError> {
    if !value.is_empty() && registry.is_known(value) {
        return Ok(value);
    }
    Err(ValidationError::new(
        Field::Category,
        ErrorKind::UnknownCategory,
        format!(
            "Unknown category '{value}'. Options: {}",
            registry.labels().join(", ")
        ),
    ))
}
