//! Crate-wide error aliases and the taxonomy of expense rejections.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The fields of an expense submission, in the order they are validated.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Description,
    Category,
    Amount,
    Account,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

impl Field {
    /// Every field, in validation order.
    pub const ALL: [Field; 5] = [
        Field::Date,
        Field::Description,
        Field::Category,
        Field::Amount,
        Field::Account,
    ];

    /// The payload key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Description => "description",
            Field::Category => "category",
            Field::Amount => "amount",
            Field::Account => "account",
        }
    }
}

/// The reasons a submission can be rejected.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request body is not a JSON object carrying the expense fields.
    MalformedPayload,
    /// A required field is absent or blank.
    MissingField,
    /// The date is not a real calendar date in `DD-MM-YYYY` form.
    InvalidDateFormat,
    /// The amount is not a decimal number.
    InvalidAmount,
    /// The amount is a number below zero.
    NegativeAmount,
    /// The category is not one of the known labels.
    UnknownCategory,
    /// The spreadsheet backend refused or failed the append.
    SheetWriteError,
}

serde_plain::derive_display_from_serialize!(ErrorKind);
serde_plain::derive_fromstr_from_deserialize!(ErrorKind);

/// A single field-level violation. Validation collects these rather than stopping at the first.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationError {
    field: Field,
    error_kind: ErrorKind,
    detail: String,
}

impl ValidationError {
    pub fn new(field: Field, error_kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            field,
            error_kind,
            detail: detail.into(),
        }
    }

    /// The field is absent or blank.
    pub fn missing(field: Field) -> Self {
        Self::new(
            field,
            ErrorKind::MissingField,
            format!("The field '{field}' is required"),
        )
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn kind(&self) -> ErrorKind {
        self.error_kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.error_kind, self.detail)
    }
}

impl std::error::Error for ValidationError {}
