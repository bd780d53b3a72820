//! Model definitions.
//!
//! A [`ModelDefinition`] is mutated by merge: impacts add fields, enum values
//! and indexes to a model that another module registered. The helpers here
//! are written so that applying the same change twice leaves the model
//! exactly as applying it once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::field::{FieldDefinition, FieldType};
use crate::identifier::{IdentifierKind, validate_identifier};

/// An index over a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDefinition {
    pub field: String,
    #[serde(default)]
    pub unique: bool,
}

/// The effect of merging a field into a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    /// The field did not exist and was appended.
    Added,
    /// A field with the same name but a different definition was overwritten.
    Replaced,
    /// An identical field already existed.
    Unchanged,
}

impl FieldChange {
    pub fn is_change(self) -> bool {
        !matches!(self, FieldChange::Unchanged)
    }
}

/// A named model with an ordered list of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    pub name: String,
    /// Name of the module that declared the model. Filled in from the
    /// manifest when left empty.
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            fields: Vec::new(),
            indexes: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Append a field, builder style.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of the fields that must be present on every record.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }

    /// Check the model name and every field.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(IdentifierKind::Model, &self.name)?;
        for field in &self.fields {
            field.validate()?;
        }
        for index in &self.indexes {
            validate_identifier(IdentifierKind::Field, &index.field)?;
        }
        Ok(())
    }

    /// Merge a field by name.
    ///
    /// Structural inequality decides: an equal field is left alone, a
    /// different one is overwritten in place (keeping its position).
    pub fn upsert_field(&mut self, field: FieldDefinition) -> FieldChange {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) if *existing == field => FieldChange::Unchanged,
            Some(existing) => {
                *existing = field;
                FieldChange::Replaced
            }
            None => {
                self.fields.push(field);
                FieldChange::Added
            }
        }
    }

    /// Add enum values to a selection field, skipping values already present.
    ///
    /// Returns how many values were appended.
    pub fn extend_enum(&mut self, field_name: &str, values: &[String]) -> Result<usize> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == field_name)
            .ok_or_else(|| Error::InvalidField {
                field: field_name.to_string(),
                reason: format!("model '{}' has no such field", self.name),
            })?;

        if field.field_type != FieldType::Selection {
            return Err(Error::InvalidField {
                field: field_name.to_string(),
                reason: format!("expected a selection field, found {}", field.field_type),
            });
        }

        let mut added = 0;
        for value in values {
            if !field.options.contains(value) {
                field.options.push(value.clone());
                added += 1;
            }
        }
        Ok(added)
    }

    /// Add an index unless an identical one exists. Returns true when added.
    pub fn add_index(&mut self, index: IndexDefinition) -> Result<bool> {
        if !self.has_field(&index.field) {
            return Err(Error::InvalidField {
                field: index.field.clone(),
                reason: format!("cannot index unknown field of model '{}'", self.name),
            });
        }
        if self.indexes.contains(&index) {
            return Ok(false);
        }
        self.indexes.push(index);
        Ok(true)
    }
}
