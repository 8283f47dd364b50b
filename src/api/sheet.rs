//! Implements the `Sheet` trait using the `sheets::Client` to interact with a Google sheet.

use crate::api::oauth::TokenProvider;
use crate::api::{a1_sheet_name, cell_range, row_range, Appended, Sheet};
use crate::model::{Column, SheetRow};
use crate::{Config, Result};
use anyhow::Context;
use sheets::types::{
    BatchUpdateValuesRequest, DateTimeRenderOption, Dimension, ValueInputOption, ValueRange,
    ValueRenderOption,
};
use tracing::{debug, trace};

/// Appends rows the same way a person would: find the first empty row, then fill in only the
/// cells of the layout. Reserved columns keep whatever the sheet owner put there.
pub(super) struct GoogleSheet {
    token_provider: TokenProvider,
}

impl GoogleSheet {
    pub(super) async fn new(config: &Config) -> Result<Self> {
        let token_provider =
            TokenProvider::load(&config.credentials_path(), reqwest::Client::new()).await?;
        Ok(Self { token_provider })
    }

    /// Creates a sheets client carrying a fresh access token. Refresh is handled by the
    /// `TokenProvider`, so the client gets no OAuth client settings.
    async fn client(&self) -> Result<sheets::Client> {
        let access_token = self.token_provider.token().await?;
        Ok(sheets::Client::new(
            String::new(),
            String::new(),
            String::new(),
            access_token,
            String::new(),
        ))
    }

    /// Counts the rows currently used in columns A through H.
    async fn used_rows(
        &self,
        client: &sheets::Client,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> Result<usize> {
        let range = format!(
            "{}!{}:{}",
            a1_sheet_name(worksheet),
            Column::FIRST,
            Column::LAST
        );
        trace!("values_get for {range}");
        let response = client
            .spreadsheets()
            .values_get(
                spreadsheet_id,
                &range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to fetch {range}"))?;
        Ok(response.body.values.len())
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    async fn append_row(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: &SheetRow,
    ) -> Result<Appended> {
        let client = self.client().await?;
        let row_number = self.used_rows(&client, spreadsheet_id, worksheet).await? + 1;
        debug!("Writing to row {row_number} of {worksheet}");

        let request = cell_updates(worksheet, row_number, row);
        client
            .spreadsheets()
            .values_batch_update(spreadsheet_id, &request)
            .await
            .map_err(map_client_error)
            .context("Failed to write the expense cells")?;

        Ok(Appended::new(row_range(worksheet, row_number)))
    }
}

/// One single-cell range per populated column of `row`, entered as if typed by a user so that
/// dates and amounts are recognized by the sheet.
fn cell_updates(worksheet: &str, row_number: usize, row: &SheetRow) -> BatchUpdateValuesRequest {
    let data = row
        .cells()
        .map(|(column, value)| ValueRange {
            major_dimension: Some(Dimension::Rows),
            range: cell_range(worksheet, column, row_number),
            values: vec![vec![value.to_string()]],
        })
        .collect();
    BatchUpdateValuesRequest {
        data,
        include_values_in_response: Some(false),
        response_date_time_render_option: None,
        response_value_render_option: None,
        value_input_option: Some(ValueInputOption::UserEntered),
    }
}

fn map_client_error(e: sheets::ClientError) -> anyhow::Error {
    anyhow::anyhow!("Google Sheets API error: {e}")
}
