//! Implements the `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without using Google Sheets.

use crate::api::{row_range, Appended, Sheet};
use crate::model::SheetRow;
use crate::Result;
use anyhow::bail;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Header row seeded by `TestSheet::with_header`, matching the column layout.
const HEADER: [&str; 8] = [
    "Date",
    "",
    "Description",
    "Category",
    "",
    "",
    "Amount",
    "Account",
];

/// An implementation of the `Sheet` trait that keeps worksheets in memory. Clones share the same
/// data, so a test can hand one clone to the handler and inspect another.
#[derive(Debug, Clone, Default)]
pub struct TestSheet {
    worksheets: Arc<Mutex<HashMap<String, Vec<Vec<String>>>>>,
    failure: Option<String>,
}

impl TestSheet {
    /// An empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sheet whose `worksheet` already holds a header row.
    pub fn with_header(worksheet: &str) -> Self {
        let sheet = Self::new();
        sheet.seed(worksheet, vec![HEADER.iter().map(|s| s.to_string()).collect()]);
        sheet
    }

    /// A sheet that fails every append with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Replaces the rows of `worksheet`.
    pub fn seed(&self, worksheet: &str, rows: Vec<Vec<String>>) {
        let _ = self.lock().insert(worksheet.to_string(), rows);
    }

    /// The rows of `worksheet`, empty when it has never been written.
    pub fn rows(&self, worksheet: &str) -> Vec<Vec<String>> {
        self.lock().get(worksheet).cloned().unwrap_or_default()
    }

    /// Locks the worksheets, ignoring poisoning since the rows are always left consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Vec<String>>>> {
        self.worksheets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn append_row(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: &SheetRow,
    ) -> Result<Appended> {
        if let Some(message) = &self.failure {
            bail!("{message}");
        }
        let mut worksheets = self.lock();
        let rows = worksheets.entry(worksheet.to_string()).or_default();
        rows.push(row.to_values());
        let range = row_range(worksheet, rows.len());
        debug!("Appended test row to {spreadsheet_id} at {range}");
        Ok(Appended::new(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn row(description: &str) -> SheetRow {
        serde_json::from_value(serde_json::json!({
            "A": "24-10-2025",
            "C": description,
            "D": "Luz",
            "G": "10.00",
            "H": "Banco"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_append_after_header() {
        let sheet = TestSheet::with_header("Gastos");
        let appended = sheet.append_row("id", "Gastos", &row("one")).await.unwrap();
        assert_eq!(appended.updated_range(), "Gastos!A2:H2");
        let appended = sheet.append_row("id", "Gastos", &row("two")).await.unwrap();
        assert_eq!(appended.updated_range(), "Gastos!A3:H3");

        let rows = sheet.rows("Gastos");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][Column::C.index()], "two");
        assert_eq!(rows[2][Column::B.index()], "");
    }

    #[tokio::test]
    async fn test_append_to_new_worksheet() {
        let sheet = TestSheet::new();
        let appended = sheet.append_row("id", "Nueva", &row("x")).await.unwrap();
        assert_eq!(appended.updated_range(), "Nueva!A1:H1");
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let sheet = TestSheet::new();
        let clone = sheet.clone();
        clone.append_row("id", "Gastos", &row("x")).await.unwrap();
        assert_eq!(sheet.rows("Gastos").len(), 1);
    }

    #[tokio::test]
    async fn test_failing() {
        let sheet = TestSheet::failing("quota exceeded");
        let e = sheet.append_row("id", "Gastos", &row("x")).await.unwrap_err();
        assert!(e.to_string().contains("quota exceeded"));
        assert!(sheet.rows("Gastos").is_empty());
    }

    #[tokio::test]
    async fn test_poisoned_lock_keeps_working() {
        let sheet = TestSheet::with_header("Gastos");
        let clone = sheet.clone();
        let panicked = std::thread::spawn(move || {
            let _guard = clone.worksheets.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(panicked.is_err());
        assert!(sheet.worksheets.is_poisoned());

        sheet.seed("Otra", vec![vec!["x".to_string()]]);
        assert_eq!(sheet.rows("Otra").len(), 1);
        let appended = sheet.append_row("id", "Gastos", &row("x")).await.unwrap();
        assert_eq!(appended.updated_range(), "Gastos!A2:H2");
    }
}
