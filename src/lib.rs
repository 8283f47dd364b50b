//! expense-sheet validates household expense submissions and appends each valid one as a row of a
//! Google sheet.
//!
//! The flow for one submission is `ExpenseInput::parse` → `normalize` → `SheetRow::from` →
//! `Sheet::append_row` → `Response`. `RequestHandler` runs it, `server` exposes it over HTTP.

mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod handler;
pub mod model;
mod normalize;
mod response;
pub mod server;
mod utils;
mod validate;

pub use api::{Appended, Mode, Sheet, TestSheet, TEST_MODE_ENV};
pub use config::{Config, SheetTarget};
pub use error::{Error, ErrorKind, Field, Result, ValidationError};
pub use handler::RequestHandler;
pub use normalize::normalize;
pub use response::{Body, ErrorEntry, Response};
pub use validate::{validate_amount, validate_category, validate_date, validate_text};
