//! The raw submission as received and the validated expense built from it.

use crate::error::Field;
use crate::model::{Amount, ExpenseDate};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// The raw, untrusted fields of a submission. Keys may be missing and values may be anything.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ExpenseInput {
    fields: BTreeMap<String, String>,
}

impl ExpenseInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy in tests.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let _ = self.fields.insert(key.into(), value.into());
    }

    /// The raw value for `field`, if the key was present.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(field.key()).map(String::as_str)
    }

    /// Parses a request body. The expense object may be the body itself or may be wrapped in a
    /// gateway event under `"body"`, either as an object or as a JSON-encoded string.
    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| PayloadError::new(format!("The body is not valid JSON: {e}")))?;
        Self::from_json(value)
    }

    pub fn from_json(value: Value) -> Result<Self, PayloadError> {
        let object = unwrap_envelope(value)?;
        let mut input = ExpenseInput::new();
        for field in Field::ALL {
            let key = field.key();
            match object.get(key) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => input.insert(key, s.as_str()),
                Some(Value::Number(n)) => input.insert(key, n.to_string()),
                Some(other) => {
                    return Err(PayloadError::new(format!(
                        "The field '{key}' must be a string, got {}",
                        json_type(other)
                    )))
                }
            }
        }
        Ok(input)
    }
}

impl<K, V> FromIterator<(K, V)> for ExpenseInput
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut input = ExpenseInput::new();
        for (k, v) in iter {
            input.insert(k, v);
        }
        input
    }
}

fn unwrap_envelope(value: Value) -> Result<Map<String, Value>, PayloadError> {
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(PayloadError::new(format!(
                "Expected a JSON object, got {}",
                json_type(&other)
            )))
        }
    };
    match object.remove("body") {
        None => Ok(object),
        Some(Value::Object(inner)) => Ok(inner),
        Some(Value::String(encoded)) => match serde_json::from_str(&encoded) {
            Ok(Value::Object(inner)) => Ok(inner),
            Ok(other) => Err(PayloadError::new(format!(
                "Expected the event body to hold a JSON object, got {}",
                json_type(&other)
            ))),
            Err(e) => Err(PayloadError::new(format!(
                "The event body is not valid JSON: {e}"
            ))),
        },
        Some(other) => Err(PayloadError::new(format!(
            "Expected the event body to be an object or a string, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The request body could not be read as an expense submission at all.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PayloadError(String);

impl PayloadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for PayloadError {}

/// A validated expense. The only way to get one is through `normalize`, so every instance
/// satisfies all of the field rules.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpenseRecord {
    date: ExpenseDate,
    description: String,
    category: String,
    amount: Amount,
    account: String,
}

impl ExpenseRecord {
    pub(crate) fn new(
        date: ExpenseDate,
        description: String,
        category: String,
        amount: Amount,
        account: String,
    ) -> Self {
        Self {
            date,
            description,
            category,
            amount,
            account,
        }
    }

    pub fn date(&self) -> ExpenseDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn account(&self) -> &str {
        &self.account
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPENSE: &str = r#"{"date":"24-10-2025","description":"Cena","category":"Recreacional","amount":"100.00","account":"Banco de Chile"}"#;

    #[test]
    fn test_parse_plain_object() {
        let input = ExpenseInput::parse(EXPENSE.as_bytes()).unwrap();
        assert_eq!(input.get(Field::Date), Some("24-10-2025"));
        assert_eq!(input.get(Field::Account), Some("Banco de Chile"));
    }

    #[test]
    fn test_parse_event_with_object_body() {
        let event = format!(r#"{{"body": {EXPENSE}}}"#);
        let input = ExpenseInput::parse(event.as_bytes()).unwrap();
        assert_eq!(input.get(Field::Description), Some("Cena"));
    }

    #[test]
    fn test_parse_event_with_string_body() {
        let event = serde_json::json!({ "body": EXPENSE }).to_string();
        let input = ExpenseInput::parse(event.as_bytes()).unwrap();
        assert_eq!(input.get(Field::Category), Some("Recreacional"));
    }

    #[test]
    fn test_numbers_are_accepted_as_text() {
        let input = ExpenseInput::parse(br#"{"amount": 42.5}"#).unwrap();
        assert_eq!(input.get(Field::Amount), Some("42.5"));
    }

    #[test]
    fn test_null_is_missing() {
        let input = ExpenseInput::parse(br#"{"account": null}"#).unwrap();
        assert_eq!(input.get(Field::Account), None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let input = ExpenseInput::parse(br#"{"foo": [1, 2], "date": "01-01-2025"}"#).unwrap();
        assert_eq!(input, ExpenseInput::new().with("date", "01-01-2025"));
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(ExpenseInput::parse(b"").is_err());
        assert!(ExpenseInput::parse(b"{not json").is_err());
        assert!(ExpenseInput::parse(b"[1, 2, 3]").is_err());
        assert!(ExpenseInput::parse(b"\"hello\"").is_err());
        assert!(ExpenseInput::parse(br#"{"body": "{oops"}"#).is_err());
        assert!(ExpenseInput::parse(br#"{"body": "[]"}"#).is_err());
        assert!(ExpenseInput::parse(br#"{"body": 5}"#).is_err());
        assert!(ExpenseInput::parse(br#"{"amount": true}"#).is_err());
        assert!(ExpenseInput::parse(br#"{"category": ["Luz"]}"#).is_err());
    }

    #[test]
    fn test_from_iter() {
        let input: ExpenseInput = [("date", "01-01-2025"), ("amount", "5")]
            .into_iter()
            .collect();
        assert_eq!(input.get(Field::Amount), Some("5"));
        assert_eq!(input.get(Field::Account), None);
    }
}
