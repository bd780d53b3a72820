//! Impacts: declarative schema mutations one module applies to a model.
//!
//! Manifests carry impacts as loosely shaped objects ([`RawImpact`]). They are
//! decoded exactly once, at validation time, into the typed [`Impact`] union,
//! so nothing downstream ever inspects an untyped payload.
//!
//! | action | payload |
//! |---|---|
//! | `addField` / `addRelation` | `targetModel`, `field` (object) |
//! | `extendEnum` | `targetModel`, `field` (name), `values` (strings) |
//! | `addIndex` | `targetModel`, `field` (name), optional `unique` |
//! | `createModelTable` | `targetModel` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::field::FieldDefinition;
use crate::identifier::{IdentifierKind, validate_identifier};
use crate::model::IndexDefinition;

/// The five recognised impact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImpactAction {
    AddField,
    AddRelation,
    ExtendEnum,
    AddIndex,
    CreateModelTable,
}

impl ImpactAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ImpactAction::AddField => "addField",
            ImpactAction::AddRelation => "addRelation",
            ImpactAction::ExtendEnum => "extendEnum",
            ImpactAction::AddIndex => "addIndex",
            ImpactAction::CreateModelTable => "createModelTable",
        }
    }
}

impl fmt::Display for ImpactAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpactAction {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "addField" => Ok(ImpactAction::AddField),
            "addRelation" => Ok(ImpactAction::AddRelation),
            "extendEnum" => Ok(ImpactAction::ExtendEnum),
            "addIndex" => Ok(ImpactAction::AddIndex),
            "createModelTable" => Ok(ImpactAction::CreateModelTable),
            other => Err(Error::UnknownImpactAction {
                action: other.to_string(),
            }),
        }
    }
}

/// An impact exactly as it appears in a manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImpact {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_model: Option<String>,
    /// A field object for `addField`/`addRelation`, a field name otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Value>,
    /// Alternative spelling of `field` for the object-carrying actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_object: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
}

/// A validated, strongly typed impact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Impact {
    #[serde(rename_all = "camelCase")]
    AddField {
        target_model: String,
        field: FieldDefinition,
    },
    #[serde(rename_all = "camelCase")]
    AddRelation {
        target_model: String,
        field: FieldDefinition,
    },
    #[serde(rename_all = "camelCase")]
    ExtendEnum {
        target_model: String,
        field: String,
        values: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddIndex {
        target_model: String,
        index: IndexDefinition,
    },
    #[serde(rename_all = "camelCase")]
    CreateModelTable { target_model: String },
}

impl Impact {
    pub fn action(&self) -> ImpactAction {
        match self {
            Impact::AddField { .. } => ImpactAction::AddField,
            Impact::AddRelation { .. } => ImpactAction::AddRelation,
            Impact::ExtendEnum { .. } => ImpactAction::ExtendEnum,
            Impact::AddIndex { .. } => ImpactAction::AddIndex,
            Impact::CreateModelTable { .. } => ImpactAction::CreateModelTable,
        }
    }

    pub fn target_model(&self) -> &str {
        match self {
            Impact::AddField { target_model, .. }
            | Impact::AddRelation { target_model, .. }
            | Impact::ExtendEnum { target_model, .. }
            | Impact::AddIndex { target_model, .. }
            | Impact::CreateModelTable { target_model } => target_model,
        }
    }

    /// Name of the field the impact touches, if any.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Impact::AddField { field, .. } | Impact::AddRelation { field, .. } => {
                Some(&field.name)
            }
            Impact::ExtendEnum { field, .. } => Some(field),
            Impact::AddIndex { index, .. } => Some(&index.field),
            Impact::CreateModelTable { .. } => None,
        }
    }

    /// Short human label such as `addField contact.email`.
    pub fn describe(&self) -> String {
        match self.field_name() {
            Some(field) => format!("{} {}.{}", self.action(), self.target_model(), field),
            None => format!("{} {}", self.action(), self.target_model()),
        }
    }

    /// Re-check every identifier the impact carries.
    ///
    /// Storage backends call this before touching anything, since impacts can
    /// also be built in code without going through [`Impact::decode`].
    pub fn validate(&self) -> Result<()> {
        validate_identifier(IdentifierKind::Model, self.target_model())?;
        match self {
            Impact::AddField { field, .. } | Impact::AddRelation { field, .. } => field.validate(),
            Impact::ExtendEnum { field, .. } => validate_identifier(IdentifierKind::Field, field),
            Impact::AddIndex { index, .. } => {
                validate_identifier(IdentifierKind::Field, &index.field)
            }
            Impact::CreateModelTable { .. } => Ok(()),
        }
    }

    /// Decode and validate a raw manifest impact.
    pub fn decode(raw: &RawImpact) -> Result<Self> {
        let action: ImpactAction = raw.action.parse()?;
        let malformed = |reason: &str| Error::MalformedImpact {
            action: raw.action.clone(),
            reason: reason.to_string(),
        };

        let target_model = raw
            .target_model
            .clone()
            .ok_or_else(|| malformed("missing 'targetModel'"))?;
        validate_identifier(IdentifierKind::Model, &target_model)?;

        let impact = match action {
            ImpactAction::AddField | ImpactAction::AddRelation => {
                let value = raw
                    .field
                    .as_ref()
                    .filter(|v| v.is_object())
                    .or(raw.field_object.as_ref())
                    .ok_or_else(|| malformed("missing 'field' object"))?;
                let field: FieldDefinition = serde_json::from_value(value.clone())
                    .map_err(|e| malformed(&format!("invalid field object: {e}")))?;
                field.validate()?;
                if action == ImpactAction::AddField {
                    Impact::AddField {
                        target_model,
                        field,
                    }
                } else {
                    Impact::AddRelation {
                        target_model,
                        field,
                    }
                }
            }
            ImpactAction::ExtendEnum => {
                let field = field_name(raw).ok_or_else(|| malformed("missing 'field' name"))?;
                validate_identifier(IdentifierKind::Field, &field)?;
                let values = raw
                    .values
                    .as_ref()
                    .ok_or_else(|| malformed("missing 'values' array"))?
                    .iter()
                    .map(|v| {
                        v.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| malformed("'values' must contain only strings"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Impact::ExtendEnum {
                    target_model,
                    field,
                    values,
                }
            }
            ImpactAction::AddIndex => {
                let field = field_name(raw).ok_or_else(|| malformed("missing 'field' name"))?;
                validate_identifier(IdentifierKind::Field, &field)?;
                Impact::AddIndex {
                    target_model,
                    index: IndexDefinition {
                        field,
                        unique: raw.unique.unwrap_or(false),
                    },
                }
            }
            ImpactAction::CreateModelTable => Impact::CreateModelTable { target_model },
        };

        Ok(impact)
    }
}

fn field_name(raw: &RawImpact) -> Option<String> {
    raw.field.as_ref().and_then(Value::as_str).map(str::to_string)
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
