//! Record tables for the in-memory backend.

use std::collections::BTreeMap;

use chrono::Utc;
use forge_query::{DynamicRecord, FilterCondition, matches_all};
use serde_json::{Map, Value};

/// Records keyed by model name, kept in insertion order per table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    tables: BTreeMap<String, Vec<DynamicRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_table(&self, model: &str) -> bool {
        self.tables.contains_key(model)
    }

    /// Create an empty table. Returns false when it already existed.
    pub fn ensure_table(&mut self, model: &str) -> bool {
        if self.tables.contains_key(model) {
            return false;
        }
        self.tables.insert(model.to_string(), Vec::new());
        true
    }

    /// Records of `model`; an absent table reads as empty.
    pub fn table(&self, model: &str) -> &[DynamicRecord] {
        self.tables.get(model).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, model: &str, id: &str) -> Option<&DynamicRecord> {
        self.table(model).iter().find(|r| r.id == id)
    }

    pub fn insert(&mut self, model: &str, record: DynamicRecord) {
        self.tables
            .entry(model.to_string())
            .or_default()
            .push(record);
    }

    /// Merge `data` into the record and bump its update timestamp.
    pub fn merge(
        &mut self,
        model: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Option<&DynamicRecord> {
        let record = self
            .tables
            .get_mut(model)?
            .iter_mut()
            .find(|r| r.id == id)?;
        record.data.extend(data);
        record.updated_at = Utc::now();
        Some(&*record)
    }

    pub fn remove(&mut self, model: &str, id: &str) -> Option<DynamicRecord> {
        let table = self.tables.get_mut(model)?;
        let pos = table.iter().position(|r| r.id == id)?;
        Some(table.remove(pos))
    }

    /// Remove every record matching `conditions`. Returns how many went.
    pub fn remove_matching(&mut self, model: &str, conditions: &[FilterCondition]) -> usize {
        let Some(table) = self.tables.get_mut(model) else {
            return 0;
        };
        let before = table.len();
        table.retain(|record| !matches_all(conditions, record));
        before - table.len()
    }

    pub fn len(&self, model: &str) -> usize {
        self.table(model).len()
    }
}
