//! Error types for forge-schema

use crate::identifier::IdentifierKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid {kind} identifier '{value}': only ASCII letters, digits, '_' and '.' are allowed")]
    InvalidIdentifier { kind: IdentifierKind, value: String },

    #[error("Unknown impact action '{action}'")]
    UnknownImpactAction { action: String },

    #[error("Malformed '{action}' impact: {reason}")]
    MalformedImpact { action: String, reason: String },

    #[error("Invalid field definition '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}
