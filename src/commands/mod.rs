//! Command handlers for the expense-sheet CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod categories;
mod init;
mod serve;
mod submit;

use crate::args::PayloadArgs;
use crate::{utils, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

pub use categories::categories;
pub use init::init;
pub use serve::serve;
pub use submit::{submit, validate, Validated};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to stdout, so
    /// that it can be piped into other tools.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            match serde_json::to_string_pretty(structure) {
                Ok(json) => println!("{json}"),
                Err(e) => debug!("Unable to serialize the command output: {e}"),
            }
        }
    }
}

/// Reads the payload from `--payload`, `--file` or standard input, in that order of preference.
async fn read_payload(args: &PayloadArgs) -> Result<Vec<u8>> {
    if let Some(payload) = args.payload() {
        return Ok(payload.as_bytes().to_vec());
    }
    if let Some(file) = args.file() {
        return utils::read_bytes(file).await;
    }
    debug!("Reading the payload from stdin");
    let mut payload = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut payload)
        .await
        .context("Unable to read the payload from stdin")?;
    Ok(payload)
}
