//! Storage backend abstraction
//!
//! The installer and the record APIs only ever talk to storage through
//! [`StorageBackend`]. The in-memory backend is one implementation among
//! others; a database adapter implements the same trait.

use chrono::{DateTime, Utc};
use forge_modules::ModuleDescriptor;
use forge_query::{DynamicRecord, QueryOptions};
use forge_schema::{Impact, ImpactAction, ModelDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// What applying an impact did to the stored schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactOutcome {
    /// The model definition (or its table) changed.
    Applied,
    /// The impact was already in effect; nothing changed.
    Unchanged,
}

impl ImpactOutcome {
    pub fn from_changed(changed: bool) -> Self {
        if changed {
            ImpactOutcome::Applied
        } else {
            ImpactOutcome::Unchanged
        }
    }
}

/// Which module last took ownership of a model, and at which version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedSchema {
    pub model: String,
    pub module: String,
    pub version: String,
    pub updated_at: DateTime<Utc>,
}

/// One entry of the schema change log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaChange {
    pub model: String,
    pub action: ImpactAction,
    pub module: String,
    pub operation: String,
    pub at: DateTime<Utc>,
}

/// Trait implemented by every storage adapter.
///
/// Transaction control, managed-schema bookkeeping and change logging are
/// optional: their default implementations return [`Error::Unsupported`],
/// which callers are free to ignore. Everything else is required.
pub trait StorageBackend: Send {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Idempotent setup hook, called once per installation.
    fn init(&mut self) -> Result<()>;

    fn begin_transaction(&mut self) -> Result<()> {
        Err(Error::unsupported("begin_transaction"))
    }

    fn commit(&mut self) -> Result<()> {
        Err(Error::unsupported("commit"))
    }

    fn rollback(&mut self) -> Result<()> {
        Err(Error::unsupported("rollback"))
    }

    /// Register a model, overwriting any stored definition of the same name.
    ///
    /// Must be safe to repeat.
    fn register_model(&mut self, model: &ModelDefinition) -> Result<()>;

    /// Apply one impact on behalf of `module`.
    ///
    /// Applying the same impact twice must leave the model exactly as
    /// applying it once, and reports [`ImpactOutcome::Unchanged`] the second
    /// time.
    fn apply_impact(&mut self, module: &ModuleDescriptor, impact: &Impact)
    -> Result<ImpactOutcome>;

    fn upsert_managed_schema(&mut self, _model: &str, _module: &ModuleDescriptor) -> Result<()> {
        Err(Error::unsupported("upsert_managed_schema"))
    }

    fn managed_schema(&self, _model: &str) -> Result<Option<ManagedSchema>> {
        Err(Error::unsupported("managed_schema"))
    }

    fn log_schema_change(
        &mut self,
        _model: &str,
        _impact: &Impact,
        _module: &ModuleDescriptor,
        _operation: &str,
    ) -> Result<()> {
        Err(Error::unsupported("log_schema_change"))
    }

    fn create_record(&mut self, model: &str, data: Map<String, Value>) -> Result<DynamicRecord>;

    /// Fails with [`Error::RecordNotFound`] when the id is unknown.
    fn record_by_id(&self, model: &str, id: &str) -> Result<DynamicRecord>;

    fn records(&self, model: &str, options: &QueryOptions) -> Result<Vec<DynamicRecord>>;

    /// Merge `data` into an existing record.
    fn update_record(
        &mut self,
        model: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<DynamicRecord>;

    fn delete_record(&mut self, model: &str, id: &str) -> Result<()>;

    /// Delete every record matching the options' conditions. Returns the count.
    fn delete_records(&mut self, model: &str, options: &QueryOptions) -> Result<usize>;

    /// Update the record with this id, or create it when absent.
    fn upsert_record(
        &mut self,
        model: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<DynamicRecord>;

    fn model_exists(&self, model: &str) -> Result<bool>;

    fn model_definition(&self, model: &str) -> Result<Option<ModelDefinition>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_schema::{FieldDefinition, FieldType};

    /// Implements only what the trait requires.
    struct Minimal;

    impl StorageBackend for Minimal {
        fn name(&self) -> &str {
            "minimal"
        }
        fn init(&mut self) -> Result<()> {
            Ok(())
        }
        fn register_model(&mut self, _model: &ModelDefinition) -> Result<()> {
            Ok(())
        }
        fn apply_impact(
            &mut self,
            _module: &ModuleDescriptor,
            _impact: &Impact,
        ) -> Result<ImpactOutcome> {
            Ok(ImpactOutcome::Applied)
        }
        fn create_record(&mut self, _model: &str, data: Map<String, Value>) -> Result<DynamicRecord> {
            Ok(DynamicRecord::new("1", data))
        }
        fn record_by_id(&self, model: &str, id: &str) -> Result<DynamicRecord> {
            Err(Error::RecordNotFound {
                model: model.into(),
                id: id.into(),
            })
        }
        fn records(&self, _model: &str, _options: &QueryOptions) -> Result<Vec<DynamicRecord>> {
            Ok(Vec::new())
        }
        fn update_record(
            &mut self,
            _model: &str,
            id: &str,
            data: Map<String, Value>,
        ) -> Result<DynamicRecord> {
            Ok(DynamicRecord::new(id, data))
        }
        fn delete_record(&mut self, _model: &str, _id: &str) -> Result<()> {
            Ok(())
        }
        fn delete_records(&mut self, _model: &str, _options: &QueryOptions) -> Result<usize> {
            Ok(0)
        }
        fn upsert_record(
            &mut self,
            _model: &str,
            id: &str,
            data: Map<String, Value>,
        ) -> Result<DynamicRecord> {
            Ok(DynamicRecord::new(id, data))
        }
        fn model_exists(&self, _model: &str) -> Result<bool> {
            Ok(false)
        }
        fn model_definition(&self, _model: &str) -> Result<Option<ModelDefinition>> {
            Ok(None)
        }
    }

    #[test]
    fn test_optional_operations_default_to_unsupported() {
        let mut backend = Minimal;
        let module = ModuleDescriptor::new("crm", "1.0.0");
        let impact = Impact::AddField {
            target_model: "contact".into(),
            field: FieldDefinition::new("email", FieldType::String),
        };

        assert!(backend.begin_transaction().unwrap_err().is_unsupported());
        assert!(backend.commit().unwrap_err().is_unsupported());
        assert!(backend.rollback().unwrap_err().is_unsupported());
        assert!(
            backend
                .upsert_managed_schema("contact", &module)
                .unwrap_err()
                .is_unsupported()
        );
        assert!(backend.managed_schema("contact").unwrap_err().is_unsupported());
        assert!(
            backend
                .log_schema_change("contact", &impact, &module, "apply")
                .unwrap_err()
                .is_unsupported()
        );
    }

    #[test]
    fn test_outcome_from_changed() {
        assert_eq!(ImpactOutcome::from_changed(true), ImpactOutcome::Applied);
        assert_eq!(ImpactOutcome::from_changed(false), ImpactOutcome::Unchanged);
    }
}
