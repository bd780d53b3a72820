//! [`RecordingBackend`]: a [`MemoryBackend`] wrapper that journals every
//! call and can be told to fail.

use std::collections::{HashMap, HashSet};

use forge_modules::ModuleDescriptor;
use forge_query::{DynamicRecord, QueryOptions};
use forge_schema::{Impact, ModelDefinition};
use forge_store::{
    Error, ImpactOutcome, ManagedSchema, MemoryBackend, MemoryBackendOptions, Result,
    StorageBackend,
};
use serde_json::{Map, Value};

/// Journals calls such as `register_model contact` or
/// `apply_impact addField contact.email` and delegates to an inner
/// [`MemoryBackend`].
///
/// Faults are keyed by operation name (`init`, `begin_transaction`,
/// `commit`, `rollback`, `register_model`, `upsert_managed_schema`,
/// `log_schema_change`) or, for impacts, by the impact label.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    inner: MemoryBackend,
    calls: Vec<String>,
    failing: HashMap<String, String>,
    unsupported: HashSet<&'static str>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MemoryBackendOptions) -> Self {
        Self {
            inner: MemoryBackend::with_options(options),
            ..Self::default()
        }
    }

    /// Make `operation` fail with a backend error.
    pub fn fail(mut self, operation: &str) -> Self {
        self.failing
            .insert(operation.to_string(), format!("injected {operation} failure"));
        self
    }

    /// Make the impact with this label (e.g. `addField contact.email`) fail.
    pub fn fail_impact(self, label: &str) -> Self {
        self.fail(label)
    }

    /// Make `operation` report [`Error::Unsupported`].
    pub fn unsupported(mut self, operation: &'static str) -> Self {
        self.unsupported.insert(operation);
        self
    }

    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Journal entries starting with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> Vec<&str> {
        self.calls
            .iter()
            .map(String::as_str)
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn inner(&self) -> &MemoryBackend {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut MemoryBackend {
        &mut self.inner
    }

    fn record(&mut self, entry: String) {
        self.calls.push(entry);
    }

    /// Journal `entry`, then apply any fault registered for `key`.
    fn check(&mut self, key: &str, operation: &'static str, entry: String) -> Result<()> {
        self.record(entry);
        if self.unsupported.contains(&operation) {
            return Err(Error::Unsupported { operation });
        }
        match self.failing.get(key) {
            Some(message) => Err(Error::Backend {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl StorageBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn init(&mut self) -> Result<()> {
        self.check("init", "init", "init".into())?;
        self.inner.init()
    }

    fn begin_transaction(&mut self) -> Result<()> {
        self.check(
            "begin_transaction",
            "begin_transaction",
            "begin_transaction".into(),
        )?;
        self.inner.begin_transaction()
    }

    fn commit(&mut self) -> Result<()> {
        self.check("commit", "commit", "commit".into())?;
        self.inner.commit()
    }

    fn rollback(&mut self) -> Result<()> {
        self.check("rollback", "rollback", "rollback".into())?;
        self.inner.rollback()
    }

    fn register_model(&mut self, model: &ModelDefinition) -> Result<()> {
        self.check(
            "register_model",
            "register_model",
            format!("register_model {}", model.name),
        )?;
        self.inner.register_model(model)
    }

    fn apply_impact(
        &mut self,
        module: &ModuleDescriptor,
        impact: &Impact,
    ) -> Result<ImpactOutcome> {
        let label = impact.describe();
        self.check(&label, "apply_impact", format!("apply_impact {label}"))?;
        self.inner.apply_impact(module, impact)
    }

    fn upsert_managed_schema(&mut self, model: &str, module: &ModuleDescriptor) -> Result<()> {
        self.check(
            "upsert_managed_schema",
            "upsert_managed_schema",
            format!("upsert_managed_schema {model}"),
        )?;
        self.inner.upsert_managed_schema(model, module)
    }

    fn managed_schema(&self, model: &str) -> Result<Option<ManagedSchema>> {
        self.inner.managed_schema(model)
    }

    fn log_schema_change(
        &mut self,
        model: &str,
        impact: &Impact,
        module: &ModuleDescriptor,
        operation: &str,
    ) -> Result<()> {
        self.check(
            "log_schema_change",
            "log_schema_change",
            format!("log_schema_change {}", impact.describe()),
        )?;
        self.inner.log_schema_change(model, impact, module, operation)
    }

    fn create_record(&mut self, model: &str, data: Map<String, Value>) -> Result<DynamicRecord> {
        self.record(format!("create_record {model}"));
        self.inner.create_record(model, data)
    }

    fn record_by_id(&self, model: &str, id: &str) -> Result<DynamicRecord> {
        self.inner.record_by_id(model, id)
    }

    fn records(&self, model: &str, options: &QueryOptions) -> Result<Vec<DynamicRecord>> {
        self.inner.records(model, options)
    }

    fn update_record(
        &mut self,
        model: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<DynamicRecord> {
        self.record(format!("update_record {model}"));
        self.inner.update_record(model, id, data)
    }

    fn delete_record(&mut self, model: &str, id: &str) -> Result<()> {
        self.record(format!("delete_record {model}"));
        self.inner.delete_record(model, id)
    }

    fn delete_records(&mut self, model: &str, options: &QueryOptions) -> Result<usize> {
        self.record(format!("delete_records {model}"));
        self.inner.delete_records(model, options)
    }

    fn upsert_record(
        &mut self,
        model: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<DynamicRecord> {
        self.record(format!("upsert_record {model}"));
        self.inner.upsert_record(model, id, data)
    }

    fn model_exists(&self, model: &str) -> Result<bool> {
        self.inner.model_exists(model)
    }

    fn model_definition(&self, model: &str) -> Result<Option<ModelDefinition>> {
        self.inner.model_definition(model)
    }
}
