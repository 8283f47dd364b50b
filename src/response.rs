//! Formats the outcome of a submission as a status code and a JSON body.

use crate::error::{ErrorKind, Field, ValidationError};
use crate::model::ExpenseRecord;
use crate::Result;
use anyhow::Context;
use hyper::StatusCode;
use serde::Serialize;

/// The outcome of one submission.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Response {
    status: StatusCode,
    body: Body,
}

/// The JSON body of a `Response`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    Success(Success),
    Failure(Failure),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Success {
    message: String,
    data: SuccessData,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SuccessData {
    expense: ExpenseRecord,
    updated_range: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Failure {
    message: String,
    errors: Vec<ErrorEntry>,
}

/// One reason for a failure. `field` is absent when the failure is not about a single field.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ErrorEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<Field>,
    error_kind: ErrorKind,
    detail: String,
}

impl ErrorEntry {
    pub fn field(&self) -> Option<Field> {
        self.field
    }

    pub fn kind(&self) -> ErrorKind {
        self.error_kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<ValidationError> for ErrorEntry {
    fn from(e: ValidationError) -> Self {
        Self {
            field: Some(e.field()),
            error_kind: e.kind(),
            detail: e.detail().to_string(),
        }
    }
}

impl Response {
    /// The expense was appended at `updated_range`.
    pub fn success(record: ExpenseRecord, updated_range: impl Into<String>) -> Self {
        let updated_range = updated_range.into();
        let message = format!(
            "✅ Expense recorded:\n\
             📂 Category: {}\n\
             📅 Date: {}\n\
             📝 Description: {}\n\
             💰 Amount: ${}\n\
             🏦 Account: {}\n\
             📊 Range: {updated_range}",
            record.category(),
            record.date(),
            record.description(),
            record.amount(),
            record.account(),
        );
        Self {
            status: StatusCode::OK,
            body: Body::Success(Success {
                message,
                data: SuccessData {
                    expense: record,
                    updated_range,
                },
            }),
        }
    }

    /// One or more fields were rejected.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        let message = match errors.len() {
            1 => "❌ The expense was rejected: 1 field is invalid".to_string(),
            n => format!("❌ The expense was rejected: {n} fields are invalid"),
        };
        Self::failed(
            StatusCode::BAD_REQUEST,
            message,
            errors.into_iter().map(ErrorEntry::from).collect(),
        )
    }

    /// The body could not be read as an expense.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::failed(
            StatusCode::BAD_REQUEST,
            "❌ The request body is not a valid expense payload".to_string(),
            vec![ErrorEntry {
                field: None,
                error_kind: ErrorKind::MalformedPayload,
                detail: detail.into(),
            }],
        )
    }

    /// The spreadsheet backend failed the append. The client may resubmit.
    pub fn sheet_write_failure(error: &anyhow::Error) -> Self {
        Self::failed(
            StatusCode::BAD_GATEWAY,
            "❌ The expense is valid but could not be written to the spreadsheet".to_string(),
            vec![ErrorEntry {
                field: None,
                error_kind: ErrorKind::SheetWriteError,
                detail: format!("{error:#}"),
            }],
        )
    }

    fn failed(status: StatusCode, message: String, errors: Vec<ErrorEntry>) -> Self {
        Self {
            status,
            body: Body::Failure(Failure { message, errors }),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn message(&self) -> &str {
        match &self.body {
            Body::Success(s) => &s.message,
            Body::Failure(f) => &f.message,
        }
    }

    /// The echoed expense, on success.
    pub fn expense(&self) -> Option<&ExpenseRecord> {
        match &self.body {
            Body::Success(s) => Some(&s.data.expense),
            Body::Failure(_) => None,
        }
    }

    /// The range reported by the append, on success.
    pub fn updated_range(&self) -> Option<&str> {
        match &self.body {
            Body::Success(s) => Some(&s.data.updated_range),
            Body::Failure(_) => None,
        }
    }

    /// The reasons for a failure; empty on success.
    pub fn errors(&self) -> &[ErrorEntry] {
        match &self.body {
            Body::Success(_) => &[],
            Body::Failure(f) => &f.errors,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.body).context("Unable to serialize the response body")
    }
}
