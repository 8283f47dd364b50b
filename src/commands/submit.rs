use crate::api::Mode;
use crate::args::PayloadArgs;
use crate::commands::{read_payload, Out};
use crate::handler::RequestHandler;
use crate::model::{ExpenseInput, ExpenseRecord, SheetRow};
use crate::normalize::normalize;
use crate::response::{Body, Response};
use crate::{Config, Error, Result};
use anyhow::anyhow;
use serde::Serialize;

/// Runs one submission through the handler, exactly as the server would.
///
/// # Errors
/// - Returns an error, after printing the response, when the expense was not recorded.
pub async fn submit(config: Config, mode: Mode, args: &PayloadArgs) -> Result<Out<Body>> {
    let payload = read_payload(args).await?;
    let handler = RequestHandler::from_config(&config, mode).await?;
    let response = handler.handle(&payload).await;
    if !response.is_success() {
        return Err(reject(&response));
    }
    Ok(Out::new(response.message(), response.body().clone()))
}

/// A valid expense together with the row it would produce.
#[derive(Debug, Clone, Serialize)]
pub struct Validated {
    expense: ExpenseRecord,
    row: SheetRow,
}

impl Validated {
    pub fn expense(&self) -> &ExpenseRecord {
        &self.expense
    }

    pub fn row(&self) -> &SheetRow {
        &self.row
    }
}

/// Validates one payload without touching the spreadsheet.
///
/// # Errors
/// - Returns an error, after printing the rejection, when the payload is not a valid expense.
pub async fn validate(config: &Config, args: &PayloadArgs) -> Result<Out<Validated>> {
    let payload = read_payload(args).await?;
    let input = ExpenseInput::parse(&payload)
        .map_err(|e| reject(&Response::malformed(e.to_string())))?;
    let expense =
        normalize(&input, config.categories()).map_err(|e| reject(&Response::failure(e)))?;
    let row = SheetRow::from(&expense);
    Ok(Out::new(
        "✅ The expense is valid",
        Validated { expense, row },
    ))
}

/// Prints a failed response and turns it into an error.
fn reject(response: &Response) -> Error {
    Out::new(response.message(), response.body().clone()).print();
    anyhow!("The expense was rejected with status {}", response.status())
}
