//! The spreadsheet collaborator. The `Sheet` trait is all the request handler knows about; the
//! Google implementation and the in-memory test implementation live behind it.

mod files;
mod oauth;
mod sheet;
mod sheet_test_client;

use crate::model::{Column, SheetRow};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use std::env::VarError;
use tracing::{debug, error};

pub use sheet_test_client::TestSheet;

// OAuth scopes requested for the service account
const OAUTH_SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

pub const TEST_MODE_ENV: &str = "EXPENSE_SHEET_IN_TEST_MODE";

/// Appends rows to a worksheet.
#[async_trait::async_trait]
pub trait Sheet: Send + Sync {
    /// Writes `row` below the last used row of `worksheet` and reports the range it occupies.
    async fn append_row(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: &SheetRow,
    ) -> Result<Appended>;
}

/// The result of a successful append.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Appended {
    updated_range: String,
}

impl Appended {
    pub fn new(updated_range: impl Into<String>) -> Self {
        Self {
            updated_range: updated_range.into(),
        }
    }

    pub fn updated_range(&self) -> &str {
        &self.updated_range
    }
}

/// Which `Sheet` implementation to use.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Talk to the Google Sheets API.
    #[default]
    Google,
    /// Keep rows in memory; nothing leaves the process.
    Test,
}

impl Mode {
    /// `Mode::Test` when `EXPENSE_SHEET_IN_TEST_MODE` is set and non-empty, otherwise
    /// `Mode::Google`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => {
                debug!("{TEST_MODE_ENV} is set, using the in-memory sheet");
                Mode::Test
            }
            Ok(_) | Err(VarError::NotPresent) => Mode::Google,
            Err(VarError::NotUnicode(_)) => {
                error!("{TEST_MODE_ENV} is not valid unicode, ignoring it");
                Mode::Google
            }
        }
    }
}

/// Creates the `Sheet` for `mode`.
pub async fn sheet(config: &Config, mode: Mode) -> Result<Box<dyn Sheet>> {
    match mode {
        Mode::Google => Ok(Box::new(sheet::GoogleSheet::new(config).await?)),
        Mode::Test => Ok(Box::new(TestSheet::with_header(config.worksheet_name()))),
    }
}

/// Quotes a worksheet name for A1 notation when it contains anything but letters, digits and
/// underscores. Embedded quotes are doubled.
pub(crate) fn a1_sheet_name(worksheet: &str) -> String {
    if !worksheet.is_empty()
        && worksheet
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        worksheet.to_string()
    } else {
        format!("'{}'", worksheet.replace('\'', "''"))
    }
}

/// The A1 range covering the full layout of row `row_number` (1-based).
pub(crate) fn row_range(worksheet: &str, row_number: usize) -> String {
    format!(
        "{}!{}{row_number}:{}{row_number}",
        a1_sheet_name(worksheet),
        Column::FIRST,
        Column::LAST
    )
}

/// The A1 reference of a single cell.
pub(crate) fn cell_range(worksheet: &str, column: Column, row_number: usize) -> String {
    format!("{}!{column}{row_number}", a1_sheet_name(worksheet))
}
