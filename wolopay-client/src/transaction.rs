//! Transaction requests and responses

use crate::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status category id of a completed transaction
pub const STATUS_COMPLETED: i64 = 200;

/// Form fields for creating a transaction.
///
/// `gamer_id` and `gamer_level` always come first; extra fields follow in
/// the order they were added. Setting a field twice replaces its value in
/// place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    fields: Vec<(String, Option<String>)>,
}

impl TransactionRequest {
    /// Create a request for a gamer
    pub fn new(gamer_id: impl Into<String>, gamer_level: impl Into<String>) -> Self {
        Self {
            fields: vec![
                ("gamer_id".to_string(), Some(gamer_id.into())),
                ("gamer_level".to_string(), Some(gamer_level.into())),
            ],
        }
    }

    /// With an extra field
    pub fn field(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key.into(), Some(value.into()))
    }

    /// With an extra field sent as a bare key
    pub fn flag(self, key: impl Into<String>) -> Self {
        self.set(key.into(), None)
    }

    /// Value of a field, `None` if absent or bare
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Form fields in send order
    pub fn fields(&self) -> &[(String, Option<String>)] {
        &self.fields
    }

    fn set(mut self, key: String, value: Option<String>) -> Self {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }
}

/// A transaction object returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction {
    raw: Map<String, Value>,
}

impl Transaction {
    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: Value) -> ClientResult<Self> {
        match value {
            Value::Object(raw) => Ok(Self { raw }),
            other => Err(ClientError::UnexpectedResponse(format!(
                "expected a transaction object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Transaction id, rendered as a string
    pub fn id(&self) -> Option<String> {
        match self.raw.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Payment page URL
    pub fn url(&self) -> Option<&str> {
        self.raw.get("url").and_then(Value::as_str)
    }

    /// `status_category.id`, accepting a number or a numeric string
    pub fn status_category_id(&self) -> Option<i64> {
        let id = self.raw.get("status_category")?.get("id")?;
        match id {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether the transaction reached the completed status category
    pub fn is_completed(&self) -> bool {
        self.status_category_id() == Some(STATUS_COMPLETED)
    }

    /// Raw field lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// The underlying JSON object
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Consume into the underlying JSON object
    pub fn into_raw(self) -> Map<String, Value> {
        self.raw
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
