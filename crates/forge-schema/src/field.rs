//! Field definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::identifier::{IdentifierKind, validate_identifier};

/// The storage type of a field.
///
/// A field's type never changes in place; an impact that redefines a field
/// replaces the whole definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Text,
    Relation,
    #[serde(alias = "enum")]
    Selection,
    Json,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Text => "text",
            FieldType::Relation => "relation",
            FieldType::Selection => "selection",
            FieldType::Json => "json",
        };
        f.write_str(name)
    }
}

/// What happens to dependent rows when the related row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CascadeRule {
    Cascade,
    SetNull,
    Restrict,
    NoAction,
}

/// Target of a relation field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationSpec {
    /// Name of the related model.
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<CascadeRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<CascadeRule>,
}

/// A single field of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,
    /// Allowed values of a `selection` field.
    #[serde(default, alias = "values", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDefinition {
    /// Create an optional field with no extra markers.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            relation: None,
            length: None,
            default_value: None,
            primary_key: false,
            options: Vec::new(),
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Create a relation field pointing at `target`.
    pub fn relation(name: impl Into<String>, target: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldType::Relation);
        field.relation = Some(RelationSpec {
            target: target.into(),
            on_delete: None,
            on_update: None,
        });
        field
    }

    /// Create a selection field with the given allowed values.
    pub fn selection<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(name, FieldType::Selection);
        field.options = options.into_iter().map(Into::into).collect();
        field
    }

    /// Check the field name and, for relations, the target model name.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(IdentifierKind::Field, &self.name)?;
        if let Some(relation) = &self.relation {
            validate_identifier(IdentifierKind::Model, &relation.target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_manifest_field_shape() {
        let json = r#"{
            "name": "contact_id",
            "type": "relation",
            "required": true,
            "relation": { "target": "contact", "onDelete": "cascade" }
        }"#;
        let field: FieldDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(field.name, "contact_id");
        assert_eq!(field.field_type, FieldType::Relation);
        assert!(field.required);
        assert_eq!(
            field.relation,
            Some(RelationSpec {
                target: "contact".to_string(),
                on_delete: Some(CascadeRule::Cascade),
                on_update: None,
            })
        );
    }

    #[test]
    fn test_enum_alias_maps_to_selection() {
        let field: FieldDefinition =
            serde_json::from_str(r#"{"name": "stage", "type": "enum", "values": ["new"]}"#)
                .unwrap();
        assert_eq!(field.field_type, FieldType::Selection);
        assert_eq!(field.options, vec!["new".to_string()]);
    }

    #[test]
    fn test_defaults_are_optional() {
        let field: FieldDefinition =
            serde_json::from_str(r#"{"name": "title", "type": "string"}"#).unwrap();
        assert_eq!(field, FieldDefinition::new("title", FieldType::String));
    }

    #[test]
    fn test_validate_rejects_unsafe_relation_target() {
        let field = FieldDefinition::relation("owner", "user;--");
        assert!(field.validate().is_err());
    }

    #[test]
    fn test_relation_target_is_optional() {
        let field: FieldDefinition =
            serde_json::from_str(r#"{"name": "owner", "type": "relation"}"#).unwrap();
        assert_eq!(field.relation, None);
        assert!(field.validate().is_ok());
    }
}
