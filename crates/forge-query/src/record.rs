//! Dynamic records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A schemaless record: an identifier plus an arbitrary key/value map.
///
/// Records are owned by a record store; queries only ever read, project and
/// merge copies of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRecord {
    pub id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    /// Related records attached by includes, keyed by include alias.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub includes: BTreeMap<String, Vec<DynamicRecord>>,
}

impl DynamicRecord {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            data,
            created_at: now,
            updated_at: now,
            includes: BTreeMap::new(),
        }
    }

    /// Build a record from a JSON object. Non-object values give an empty map.
    pub fn from_value(id: impl Into<String>, value: Value) -> Self {
        let data = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, data)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// String form of a field, or `None` when the record lacks it.
    ///
    /// `id` falls back to the record identifier when the data map has no
    /// `id` key of its own.
    pub fn field_text(&self, field: &str) -> Option<String> {
        match self.data.get(field) {
            Some(value) => Some(value_text(value)),
            None if field == "id" => Some(self.id.clone()),
            None => None,
        }
    }

    pub fn related(&self, alias: &str) -> Option<&[DynamicRecord]> {
        self.includes.get(alias).map(Vec::as_slice)
    }
}

/// The string form used for every comparison: strings are taken verbatim,
/// everything else is rendered as JSON text.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
