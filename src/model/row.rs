//! The worksheet column layout and the mapping of an expense onto it.

use crate::model::ExpenseRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A column of the expense worksheet. Only `A` through `H` are part of the layout.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Column {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

serde_plain::derive_display_from_serialize!(Column);
serde_plain::derive_fromstr_from_deserialize!(Column);

impl Column {
    /// Every column of the layout, left to right.
    pub const ALL: [Column; 8] = [
        Column::A,
        Column::B,
        Column::C,
        Column::D,
        Column::E,
        Column::F,
        Column::G,
        Column::H,
    ];

    pub const FIRST: Column = Column::A;
    pub const LAST: Column = Column::H;

    /// Zero-based position of the column.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Columns that belong to the sheet owner (formulas, notes) and are never written.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Column::B | Column::E | Column::F)
    }
}

pub const DATE_COLUMN: Column = Column::A;
pub const DESCRIPTION_COLUMN: Column = Column::C;
pub const CATEGORY_COLUMN: Column = Column::D;
pub const AMOUNT_COLUMN: Column = Column::G;
pub const ACCOUNT_COLUMN: Column = Column::H;

/// The cells written for one expense, keyed by column letter.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetRow {
    cells: BTreeMap<Column, String>,
}

impl SheetRow {
    pub fn get(&self, column: Column) -> Option<&str> {
        self.cells.get(&column).map(String::as_str)
    }

    /// The populated cells, left to right.
    pub fn cells(&self) -> impl Iterator<Item = (Column, &str)> {
        self.cells.iter().map(|(c, v)| (*c, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The row as a dense list of values from `A` to `H`, with empty strings for unwritten cells.
    pub fn to_values(&self) -> Vec<String> {
        Column::ALL
            .iter()
            .map(|c| self.get(*c).unwrap_or_default().to_string())
            .collect()
    }
}

impl From<&ExpenseRecord> for SheetRow {
    fn from(record: &ExpenseRecord) -> Self {
        let cells = BTreeMap::from([
            (DATE_COLUMN, record.date().to_string()),
            (DESCRIPTION_COLUMN, record.description().to_string()),
            (CATEGORY_COLUMN, record.category().to_string()),
            (AMOUNT_COLUMN, record.amount().to_string()),
            (ACCOUNT_COLUMN, record.account().to_string()),
        ]);
        Self { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, ExpenseDate};
    use std::str::FromStr;

    fn record() -> ExpenseRecord {
        ExpenseRecord::new(
            ExpenseDate::from_str("24-10-2025").unwrap(),
            "Cena".to_string(),
            "Recreacional".to_string(),
            Amount::from_str("100").unwrap(),
            "Banco de Chile".to_string(),
        )
    }

    #[test]
    fn test_column_display() {
        assert_eq!(Column::A.to_string(), "A");
        assert_eq!(Column::from_str("G").unwrap(), Column::G);
        assert!(Column::from_str("Z").is_err());
        assert!(Column::from_str("a").is_err());
    }

    #[test]
    fn test_column_index() {
        assert_eq!(Column::A.index(), 0);
        assert_eq!(Column::H.index(), 7);
        for (ix, col) in Column::ALL.iter().enumerate() {
            assert_eq!(col.index(), ix);
        }
    }

    #[test]
    fn test_row_layout() {
        let row = SheetRow::from(&record());
        assert_eq!(row.len(), 5);
        assert_eq!(row.get(Column::A), Some("24-10-2025"));
        assert_eq!(row.get(Column::C), Some("Cena"));
        assert_eq!(row.get(Column::D), Some("Recreacional"));
        assert_eq!(row.get(Column::G), Some("100.00"));
        assert_eq!(row.get(Column::H), Some("Banco de Chile"));
    }

    #[test]
    fn test_reserved_columns_are_never_written() {
        let row = SheetRow::from(&record());
        for (col, _) in row.cells() {
            assert!(!col.is_reserved(), "{col} is reserved");
        }
        assert_eq!(row.get(Column::B), None);
        assert_eq!(row.get(Column::E), None);
        assert_eq!(row.get(Column::F), None);
    }

    #[test]
    fn test_to_values() {
        let row = SheetRow::from(&record());
        assert_eq!(
            row.to_values(),
            vec![
                "24-10-2025",
                "",
                "Cena",
                "Recreacional",
                "",
                "",
                "100.00",
                "Banco de Chile"
            ]
        );
    }

    #[test]
    fn test_serialize() {
        let row = SheetRow::from(&record());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "A": "24-10-2025",
                "C": "Cena",
                "D": "Recreacional",
                "G": "100.00",
                "H": "Banco de Chile"
            })
        );
    }
}
