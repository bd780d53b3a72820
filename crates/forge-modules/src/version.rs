//! Dependency expressions and version constraint checking.
//!
//! A dependency expression names a module and optionally pins its version:
//!
//! - `crm` - any version
//! - `crm@1.2.0` - exactly 1.2.0 (`=` is the default comparator)
//! - `crm@>=1.2.0` - one of `=`, `!=`, `>`, `<`, `>=`, `<=`
//!
//! Versions are compared as dotted numeric tuples; missing trailing
//! components count as zero, so `1.2` equals `1.2.0`. There is no pre-release
//! or build metadata support. When either side is not dotted-numeric the
//! check degrades to exact string equality, whatever comparator was written.
//!
//! # Examples
//!
//! ```
//! use forge_modules::version::DependencySpec;
//!
//! let spec = DependencySpec::parse("crm@>=1.2.0").unwrap();
//! assert_eq!(spec.name, "crm");
//! assert!(spec.satisfied_by("1.3.0"));
//! assert!(!spec.satisfied_by("1.1.0"));
//! ```

use std::cmp::Ordering;
use std::fmt;

use forge_schema::{IdentifierKind, validate_identifier};

use crate::error::{Error, Result};

/// A version comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Comparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Gt => ">",
            Comparator::Lt => "<",
            Comparator::Gte => ">=",
            Comparator::Lte => "<=",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparator::Eq => ordering == Ordering::Equal,
            Comparator::Ne => ordering != Ordering::Equal,
            Comparator::Gt => ordering == Ordering::Greater,
            Comparator::Lt => ordering == Ordering::Less,
            Comparator::Gte => ordering != Ordering::Less,
            Comparator::Lte => ordering != Ordering::Greater,
        }
    }

    /// Split a leading comparator off `s`. Two-character operators are
    /// tried first so that `>=` is not read as `>`.
    fn strip(s: &str) -> (Self, &str) {
        const PREFIXES: [(&str, Comparator); 6] = [
            (">=", Comparator::Gte),
            ("<=", Comparator::Lte),
            ("!=", Comparator::Ne),
            (">", Comparator::Gt),
            ("<", Comparator::Lt),
            ("=", Comparator::Eq),
        ];
        for (prefix, comparator) in PREFIXES {
            if let Some(rest) = s.strip_prefix(prefix) {
                return (comparator, rest);
            }
        }
        (Comparator::Eq, s)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dotted numeric version such as `1.2.0`.
#[derive(Debug, Clone)]
pub struct DottedVersion(Vec<u64>);

impl DottedVersion {
    /// Parse `s`, returning `None` unless every component is a decimal number.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        s.split('.')
            .map(|part| {
                if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                    part.parse::<u64>().ok()
                } else {
                    None
                }
            })
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl Ord for DottedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for DottedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DottedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DottedVersion {}

impl fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// The version half of a dependency expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRequirement {
    pub comparator: Comparator,
    pub version: String,
}

impl VersionRequirement {
    /// Check `actual` against this requirement.
    pub fn matches(&self, actual: &str) -> bool {
        match (DottedVersion::parse(&self.version), DottedVersion::parse(actual)) {
            (Some(required), Some(actual)) => self.comparator.holds(actual.cmp(&required)),
            // Non-numeric versions can only be compared for equality.
            _ => self.version.trim() == actual.trim(),
        }
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.comparator, self.version)
    }
}

/// A parsed `name[@<cmp>version]` dependency expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: String,
    pub requirement: Option<VersionRequirement>,
}

impl DependencySpec {
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidDependency {
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(invalid("expression is empty"));
        }

        let (name, requirement) = match trimmed.split_once('@') {
            None => (trimmed, None),
            Some((name, rest)) => {
                let (comparator, version) = Comparator::strip(rest.trim());
                let version = version.trim();
                if version.is_empty() {
                    return Err(invalid("missing version after '@'"));
                }
                (
                    name.trim(),
                    Some(VersionRequirement {
                        comparator,
                        version: version.to_string(),
                    }),
                )
            }
        };

        if name.is_empty() {
            return Err(invalid("missing module name"));
        }
        validate_identifier(IdentifierKind::Module, name)?;

        Ok(Self {
            name: name.to_string(),
            requirement,
        })
    }

    /// Whether a module at `actual` version satisfies this dependency.
    pub fn satisfied_by(&self, actual: &str) -> bool {
        self.requirement
            .as_ref()
            .is_none_or(|requirement| requirement.matches(actual))
    }

    /// The constraint as written, or `*` when unconstrained.
    pub fn constraint(&self) -> String {
        self.requirement
            .as_ref()
            .map_or_else(|| "*".to_string(), ToString::to_string)
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.requirement {
            Some(requirement) => write!(f, "{}@{}", self.name, requirement),
            None => f.write_str(&self.name),
        }
    }
}
