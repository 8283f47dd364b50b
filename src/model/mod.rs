//! Types that represent the expense data model, from the raw `ExpenseInput` to the `SheetRow`
//! that is written to the worksheet.
mod amount;
mod category;
mod date;
mod expense;
mod row;

pub use amount::{Amount, AmountError};
pub use category::{Categories, CategoryRegistry, DEFAULT_CATEGORIES};
pub use date::{DateError, ExpenseDate, DATE_FORMAT};
pub use expense::{ExpenseInput, ExpenseRecord, PayloadError};
pub use row::{
    Column, SheetRow, ACCOUNT_COLUMN, AMOUNT_COLUMN, CATEGORY_COLUMN, DATE_COLUMN,
    DESCRIPTION_COLUMN,
};
