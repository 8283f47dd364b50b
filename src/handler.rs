//! The request orchestrator: parse, normalize, map, append, respond.

use crate::api::{self, Mode, Sheet};
use crate::model::{CategoryRegistry, ExpenseInput, SheetRow};
use crate::normalize::normalize;
use crate::response::Response;
use crate::{Config, Result, SheetTarget};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, trace, warn, Instrument};
use uuid::Uuid;

/// Handles one expense submission at a time. It holds no per-request state, so a single handler
/// can be shared by any number of concurrent requests.
pub struct RequestHandler {
    target: SheetTarget,
    registry: Arc<dyn CategoryRegistry>,
    sheet: Box<dyn Sheet>,
}

impl RequestHandler {
    pub fn new(
        target: SheetTarget,
        registry: Arc<dyn CategoryRegistry>,
        sheet: Box<dyn Sheet>,
    ) -> Self {
        Self {
            target,
            registry,
            sheet,
        }
    }

    /// Builds a handler for the configured spreadsheet, using the `Sheet` implementation that
    /// `mode` selects.
    pub async fn from_config(config: &Config, mode: Mode) -> Result<Self> {
        let sheet = api::sheet(config, mode).await?;
        Ok(Self::new(
            config.target().clone(),
            Arc::new(config.categories().clone()),
            sheet,
        ))
    }

    pub fn target(&self) -> &SheetTarget {
        &self.target
    }

    pub fn registry(&self) -> &dyn CategoryRegistry {
        self.registry.as_ref()
    }

    /// Runs one submission from its raw request body. Always returns a response; nothing is
    /// retried.
    pub async fn handle(&self, payload: &[u8]) -> Response {
        let span = info_span!("expense", request_id = %Uuid::new_v4());
        async move {
            trace!("Received payload: {}", String::from_utf8_lossy(payload));
            match ExpenseInput::parse(payload) {
                Ok(input) => self.submit(&input).await,
                Err(e) => {
                    warn!("Rejected malformed payload: {e}");
                    Response::malformed(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Runs one submission from already-parsed input.
    pub async fn submit(&self, input: &ExpenseInput) -> Response {
        let record = match normalize(input, self.registry.as_ref()) {
            Ok(record) => record,
            Err(errors) => {
                for e in &errors {
                    warn!("Rejected expense: {e}");
                }
                return Response::failure(errors);
            }
        };
        debug!("Validated expense: {record:?}");

        let row = SheetRow::from(&record);
        let appended = self
            .sheet
            .append_row(
                self.target.spreadsheet_id(),
                self.target.worksheet_name(),
                &row,
            )
            .await;

        match appended {
            Ok(appended) => {
                info!("Expense recorded at {}", appended.updated_range());
                Response::success(record, appended.updated_range())
            }
            Err(e) => {
                error!("Unable to append the expense: {e:#}");
                Response::sheet_write_failure(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestSheet;
    use crate::error::{ErrorKind, Field};
    use crate::model::Categories;
    use hyper::StatusCode;

    const WORKSHEET: &str = "Gastos";

    fn handler(sheet: TestSheet) -> RequestHandler {
        RequestHandler::new(
            SheetTarget::new("sheet-id", WORKSHEET),
            Arc::new(Categories::default()),
            Box::new(sheet),
        )
    }

    fn payload(value: serde_json::Value) -> Vec<u8> {
        value.to_string().into_bytes()
    }

    fn scenario_one() -> serde_json::Value {
        serde_json::json!({
            "date": "24-10-2025",
            "description": "Cena",
            "category": "Recreacional",
            "amount": "100.00",
            "account": "Banco de Chile"
        })
    }

    #[tokio::test]
    async fn test_success_appends_row() {
        let sheet = TestSheet::with_header(WORKSHEET);
        let handler = handler(sheet.clone());

        let response = handler.handle(&payload(scenario_one())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.updated_range(), Some("Gastos!A2:H2"));
        let rows = sheet.rows(WORKSHEET);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
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

    #[tokio::test]
    async fn test_validation_failure_does_not_append() {
        let sheet = TestSheet::with_header(WORKSHEET);
        let handler = handler(sheet.clone());
        let mut body = scenario_one();
        body["category"] = "Mascotas".into();

        let response = handler.handle(&payload(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.errors().len(), 1);
        assert_eq!(response.errors()[0].field(), Some(Field::Category));
        assert_eq!(sheet.rows(WORKSHEET).len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let sheet = TestSheet::with_header(WORKSHEET);
        let handler = handler(sheet.clone());

        let response = handler.handle(b"date=24-10-2025").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.errors()[0].kind(), ErrorKind::MalformedPayload);
        assert_eq!(sheet.rows(WORKSHEET).len(), 1);
    }

    #[tokio::test]
    async fn test_sheet_failure_is_surfaced() {
        let handler = handler(TestSheet::failing("The caller does not have permission"));

        let response = handler.handle(&payload(scenario_one())).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.errors().len(), 1);
        assert_eq!(response.errors()[0].kind(), ErrorKind::SheetWriteError);
        assert!(response.errors()[0]
            .detail()
            .contains("does not have permission"));
    }

    #[tokio::test]
    async fn test_gateway_event() {
        let sheet = TestSheet::with_header(WORKSHEET);
        let handler = handler(sheet.clone());
        let event = serde_json::json!({ "body": scenario_one().to_string() });

        let response = handler.handle(&payload(event)).await;

        assert!(response.is_success());
        assert_eq!(sheet.rows(WORKSHEET).len(), 2);
    }

    #[tokio::test]
    async fn test_each_submission_is_independent() {
        let sheet = TestSheet::with_header(WORKSHEET);
        let handler = handler(sheet.clone());

        let first = handler.handle(&payload(scenario_one())).await;
        let rejected = handler.handle(b"{}").await;
        let second = handler.handle(&payload(scenario_one())).await;

        assert_eq!(first.updated_range(), Some("Gastos!A2:H2"));
        assert_eq!(rejected.errors().len(), 5);
        assert_eq!(second.updated_range(), Some("Gastos!A3:H3"));
        assert_eq!(first.expense(), second.expense());
    }
}
