//! In-memory storage backend
//!
//! Keeps model definitions, record tables, managed-schema rows and the schema
//! change log in process memory. Transactions are snapshots: beginning one
//! clones the whole state, rollback restores the clone.

mod records;

pub use records::RecordStore;

use std::collections::BTreeMap;

use chrono::Utc;
use forge_modules::ModuleDescriptor;
use forge_query::{DynamicRecord, QueryEngine, QueryOptions, RecordSource};
use forge_schema::{Impact, ModelDefinition, is_safe_identifier};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::backend::{ImpactOutcome, ManagedSchema, SchemaChange, StorageBackend};
use crate::error::{Error, Result};

/// Knobs for [`MemoryBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryBackendOptions {
    /// Support snapshot transactions. When false, transaction control
    /// reports [`Error::Unsupported`].
    pub transactions: bool,
}

impl Default for MemoryBackendOptions {
    fn default() -> Self {
        Self { transactions: true }
    }
}

#[derive(Debug, Clone, Default)]
struct State {
    models: BTreeMap<String, ModelDefinition>,
    records: RecordStore,
    managed: BTreeMap<String, ManagedSchema>,
    changes: Vec<SchemaChange>,
}

/// Reference backend holding everything in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    options: MemoryBackendOptions,
    state: State,
    snapshot: Option<State>,
    initialized: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MemoryBackendOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> MemoryBackendOptions {
        self.options
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Registered models, sorted by name.
    pub fn models(&self) -> impl Iterator<Item = &ModelDefinition> {
        self.state.models.values()
    }

    pub fn model(&self, name: &str) -> Option<&ModelDefinition> {
        self.state.models.get(name)
    }

    /// Every schema change logged so far, oldest first.
    pub fn schema_changes(&self) -> &[SchemaChange] {
        &self.state.changes
    }

    pub fn record_store(&self) -> &RecordStore {
        &self.state.records
    }

    /// Load records directly, bypassing validation. Creates the table.
    pub fn seed(&mut self, model: &str, records: impl IntoIterator<Item = DynamicRecord>) {
        self.state.records.ensure_table(model);
        for record in records {
            self.state.records.insert(model, record);
        }
    }

    fn model_or_err(&self, model: &str) -> Result<&ModelDefinition> {
        self.state
            .models
            .get(model)
            .ok_or_else(|| Error::ModelNotFound {
                model: model.to_string(),
            })
    }

    fn model_mut(&mut self, model: &str) -> Result<&mut ModelDefinition> {
        self.state
            .models
            .get_mut(model)
            .ok_or_else(|| Error::ModelNotFound {
                model: model.to_string(),
            })
    }

    fn check_keys(model: &str, data: &Map<String, Value>) -> Result<()> {
        match data.keys().find(|key| !is_safe_identifier(key)) {
            Some(key) => Err(Error::Validation {
                model: model.to_string(),
                reason: format!("unsafe field name '{key}'"),
            }),
            None => Ok(()),
        }
    }

    fn insert_record(
        &mut self,
        model: &str,
        id: String,
        data: Map<String, Value>,
    ) -> Result<DynamicRecord> {
        let definition = self.model_or_err(model)?;
        Self::check_keys(model, &data)?;

        let missing: Vec<&str> = definition
            .required_fields()
            .filter(|field| data.get(*field).is_none_or(Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Validation {
                model: model.to_string(),
                reason: format!("missing required fields: {}", missing.join(", ")),
            });
        }

        let record = DynamicRecord::new(id, data);
        self.state.records.insert(model, record.clone());
        tracing::debug!(model, id = %record.id, "Record created");
        Ok(record)
    }
}

impl RecordSource for MemoryBackend {
    fn scan(&self, model: &str) -> forge_query::Result<Vec<DynamicRecord>> {
        if !self.state.models.contains_key(model) && !self.state.records.has_table(model) {
            return Err(forge_query::Error::UnknownModel {
                model: model.to_string(),
            });
        }
        Ok(self.state.records.table(model).to_vec())
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn init(&mut self) -> Result<()> {
        if !self.initialized {
            tracing::debug!("Initializing in-memory backend");
            self.initialized = true;
        }
        Ok(())
    }

    fn begin_transaction(&mut self) -> Result<()> {
        if !self.options.transactions {
            return Err(Error::unsupported("begin_transaction"));
        }
        if self.snapshot.is_some() {
            return Err(Error::Transaction {
                reason: "a transaction is already open".to_string(),
            });
        }
        self.snapshot = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if !self.options.transactions {
            return Err(Error::unsupported("commit"));
        }
        self.snapshot
            .take()
            .map(|_| ())
            .ok_or_else(|| Error::Transaction {
                reason: "commit without an open transaction".to_string(),
            })
    }

    fn rollback(&mut self) -> Result<()> {
        if !self.options.transactions {
            return Err(Error::unsupported("rollback"));
        }
        let snapshot = self.snapshot.take().ok_or_else(|| Error::Transaction {
            reason: "rollback without an open transaction".to_string(),
        })?;
        self.state = snapshot;
        tracing::debug!("Rolled back in-memory transaction");
        Ok(())
    }

    fn register_model(&mut self, model: &ModelDefinition) -> Result<()> {
        model.validate()?;
        let replaced = self
            .state
            .models
            .insert(model.name.clone(), model.clone())
            .is_some();
        tracing::debug!(model = %model.name, replaced, "Model registered");
        Ok(())
    }

    fn apply_impact(
        &mut self,
        module: &ModuleDescriptor,
        impact: &Impact,
    ) -> Result<ImpactOutcome> {
        impact.validate()?;

        let changed = match impact {
            Impact::AddField {
                target_model,
                field,
            }
            | Impact::AddRelation {
                target_model,
                field,
            } => self
                .model_mut(target_model)?
                .upsert_field(field.clone())
                .is_change(),
            Impact::ExtendEnum {
                target_model,
                field,
                values,
            } => self.model_mut(target_model)?.extend_enum(field, values)? > 0,
            Impact::AddIndex {
                target_model,
                index,
            } => self.model_mut(target_model)?.add_index(index.clone())?,
            Impact::CreateModelTable { target_model } => {
                self.model_or_err(target_model)?;
                self.state.records.ensure_table(target_model)
            }
        };

        let outcome = ImpactOutcome::from_changed(changed);
        tracing::debug!(
            module = %module.name,
            action = %impact.action(),
            model = %impact.target_model(),
            ?outcome,
            "Impact applied"
        );
        Ok(outcome)
    }

    fn upsert_managed_schema(&mut self, model: &str, module: &ModuleDescriptor) -> Result<()> {
        self.state.managed.insert(
            model.to_string(),
            ManagedSchema {
                model: model.to_string(),
                module: module.name.clone(),
                version: module.version.clone(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn managed_schema(&self, model: &str) -> Result<Option<ManagedSchema>> {
        Ok(self.state.managed.get(model).cloned())
    }

    fn log_schema_change(
        &mut self,
        model: &str,
        impact: &Impact,
        module: &ModuleDescriptor,
        operation: &str,
    ) -> Result<()> {
        self.state.changes.push(SchemaChange {
            model: model.to_string(),
            action: impact.action(),
            module: module.name.clone(),
            operation: operation.to_string(),
            at: Utc::now(),
        });
        Ok(())
    }

    fn create_record(&mut self, model: &str, data: Map<String, Value>) -> Result<DynamicRecord> {
        self.insert_record(model, Uuid::new_v4().to_string(), data)
    }

    fn record_by_id(&self, model: &str, id: &str) -> Result<DynamicRecord> {
        self.model_or_err(model)?;
        self.state
            .records
            .get(model, id)
            .cloned()
            .ok_or_else(|| Error::RecordNotFound {
                model: model.to_string(),
                id: id.to_string(),
            })
    }

    fn records(&self, model: &str, options: &QueryOptions) -> Result<Vec<DynamicRecord>> {
        Ok(QueryEngine::new(self).run(model, options)?)
    }

    fn update_record(
        &mut self,
        model: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<DynamicRecord> {
        self.model_or_err(model)?;
        Self::check_keys(model, &data)?;
        self.state
            .records
            .merge(model, id, data)
            .cloned()
            .ok_or_else(|| Error::RecordNotFound {
                model: model.to_string(),
                id: id.to_string(),
            })
    }

    fn delete_record(&mut self, model: &str, id: &str) -> Result<()> {
        self.model_or_err(model)?;
        self.state
            .records
            .remove(model, id)
            .map(|_| ())
            .ok_or_else(|| Error::RecordNotFound {
                model: model.to_string(),
                id: id.to_string(),
            })
    }

    fn delete_records(&mut self, model: &str, options: &QueryOptions) -> Result<usize> {
        self.model_or_err(model)?;
        let removed = self
            .state
            .records
            .remove_matching(model, &options.conditions);
        tracing::debug!(model, removed, "Records deleted");
        Ok(removed)
    }

    fn upsert_record(
        &mut self,
        model: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<DynamicRecord> {
        if self.state.records.get(model, id).is_some() {
            self.update_record(model, id, data)
        } else {
            self.insert_record(model, id.to_string(), data)
        }
    }

    fn model_exists(&self, model: &str) -> Result<bool> {
        Ok(self.state.models.contains_key(model))
    }

    fn model_definition(&self, model: &str) -> Result<Option<ModelDefinition>> {
        Ok(self.state.models.get(model).cloned())
    }
}
