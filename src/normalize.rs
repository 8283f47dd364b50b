//! Turns raw input into a validated `ExpenseRecord`, reporting every invalid field.

use crate::error::{Field, ValidationError};
use crate::model::{CategoryRegistry, ExpenseInput, ExpenseRecord};
use crate::validate::{validate_amount, validate_category, validate_date, validate_text};

/// Validates every field of `input` and builds an `ExpenseRecord`.
///
/// Fields are checked in the order date, description, category, amount, account, and every
/// failure is reported. A missing field yields only `MissingField`; its format checks are skipped.
/// Nothing is constructed unless all checks pass.
pub fn normalize(
    input: &ExpenseInput,
    registry: &dyn CategoryRegistry,
) -> Result<ExpenseRecord, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let date = text(input, Field::Date, &mut errors)
        .and_then(|s| collect(validate_date(s), &mut errors));
    let description = text(input, Field::Description, &mut errors);
    let category = text(input, Field::Category, &mut errors)
        .and_then(|s| collect(validate_category(s, registry), &mut errors));
    let amount = text(input, Field::Amount, &mut errors)
        .and_then(|s| collect(validate_amount(s), &mut errors));
    let account = text(input, Field::Account, &mut errors);

    match (date, description, category, amount, account) {
        (Some(date), Some(description), Some(category), Some(amount), Some(account))
            if errors.is_empty() =>
        {
            Ok(ExpenseRecord::new(
                date,
                description.to_string(),
                category.to_string(),
                amount,
                account.to_string(),
            ))
        }
        _ => Err(errors),
    }
}

fn text<'a>(
    input: &'a ExpenseInput,
    field: Field,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a str> {
    collect(validate_text(input.get(field), field), errors)
}

fn collect<T>(result: Result<T, ValidationError>, errors: &mut Vec<ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}
