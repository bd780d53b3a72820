//! Identifier safety checks.
//!
//! Model and field names end up inside storage statements, so every name
//! accepted from a manifest or a runtime call must match `^[A-Za-z0-9_.]+$`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static SAFE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("identifier pattern is valid"));

/// What an identifier names, used to make rejection messages precise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Module,
    Model,
    Field,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Module => write!(f, "module"),
            IdentifierKind::Model => write!(f, "model"),
            IdentifierKind::Field => write!(f, "field"),
        }
    }
}

/// Returns true when `value` is a non-empty run of `[A-Za-z0-9_.]`.
pub fn is_safe_identifier(value: &str) -> bool {
    SAFE_IDENTIFIER.is_match(value)
}

/// Reject `value` unless it is a safe identifier.
pub fn validate_identifier(kind: IdentifierKind, value: &str) -> Result<()> {
    if is_safe_identifier(value) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier {
            kind,
            value: value.to_string(),
        })
    }
}
