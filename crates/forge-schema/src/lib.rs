//! Schema definitions for Module Forge.
//!
//! This crate holds the data structures every other layer shares:
//!
//! - [`identifier`] - the safe-identifier check applied to model and field names
//! - [`field`] - field types and field definitions
//! - [`model`] - model definitions and their merge-by-name mutation helpers
//! - [`impact`] - the typed impact union and its decoding from raw payloads

pub mod error;
pub mod field;
pub mod identifier;
pub mod impact;
pub mod model;

pub use error::{Error, Result};
pub use field::{CascadeRule, FieldDefinition, FieldType, RelationSpec};
pub use identifier::{IdentifierKind, is_safe_identifier, validate_identifier};
pub use impact::{Impact, ImpactAction, RawImpact};
pub use model::{FieldChange, IndexDefinition, ModelDefinition};
