//! Module manifests.
//!
//! A manifest declares one module: its identity, the models it owns, the
//! modules it depends on and the impacts it applies to models owned by
//! others. Documents are read into the permissive [`ManifestDocument`] shape
//! and then validated into a [`Manifest`], which is the only form the
//! installer accepts.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "module": { "name": "sales", "version": "1.0.0", "author": "ACME" },
//!   "dependsOn": ["crm@>=1.2.0"],
//!   "models": [
//!     {
//!       "name": "product",
//!       "fields": [
//!         { "name": "title", "type": "string", "required": true },
//!         { "name": "contact_id", "type": "relation", "relation": { "target": "contact" } }
//!       ]
//!     }
//!   ],
//!   "impacts": [
//!     { "action": "extendEnum", "targetModel": "contact", "field": "stage", "values": ["buyer"] }
//!   ]
//! }
//! ```

use std::collections::HashSet;

use forge_schema::{IdentifierKind, Impact, ModelDefinition, RawImpact, validate_identifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::version::DependencySpec;

/// Identity of a module. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDescriptor {
    /// Unique module name.
    pub name: String,
    /// Dotted numeric version string.
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            author: None,
        }
    }
}

impl std::fmt::Display for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A manifest exactly as read from a file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    pub module: ModuleDescriptor,
    #[serde(default)]
    pub models: Vec<ModelDefinition>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub impacts: Vec<RawImpact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Value>,
}

/// A validated manifest with typed dependencies and impacts.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub module: ModuleDescriptor,
    /// Models in declaration order; this is the registration order.
    pub models: Vec<ModelDefinition>,
    pub dependencies: Vec<DependencySpec>,
    /// Impacts in declaration order; this is the application order.
    pub impacts: Vec<Impact>,
    /// Opaque payloads carried through untouched.
    pub views: Option<Value>,
    pub workflows: Option<Value>,
}

impl Manifest {
    /// Validate a document and decode its dependencies and impacts.
    pub fn from_document(document: ManifestDocument) -> Result<Self> {
        let ManifestDocument {
            module,
            models,
            depends_on,
            impacts,
            views,
            workflows,
        } = document;

        validate_identifier(IdentifierKind::Module, &module.name)?;
        if module.version.trim().is_empty() {
            return Err(Error::InvalidManifest {
                module: module.name.clone(),
                reason: "module version must not be empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut owned_models = Vec::with_capacity(models.len());
        for mut model in models {
            if model.module.is_empty() {
                model.module = module.name.clone();
            } else if model.module != module.name {
                return Err(Error::InvalidManifest {
                    module: module.name.clone(),
                    reason: format!(
                        "model '{}' claims to belong to module '{}'",
                        model.name, model.module
                    ),
                });
            }
            model.validate()?;
            if !seen.insert(model.name.clone()) {
                return Err(Error::InvalidManifest {
                    module: module.name.clone(),
                    reason: format!("model '{}' is declared twice", model.name),
                });
            }
            owned_models.push(model);
        }

        let dependencies = depends_on
            .iter()
            .map(|expression| DependencySpec::parse(expression))
            .collect::<Result<Vec<_>>>()?;

        let impacts = impacts
            .iter()
            .map(Impact::decode)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            module,
            models: owned_models,
            dependencies,
            impacts,
            views,
            workflows,
        })
    }

    pub fn name(&self) -> &str {
        &self.module.name
    }

    pub fn version(&self) -> &str {
        &self.module.version
    }
}

/// Validate a batch of documents, rejecting duplicate module names.
///
/// Any failure aborts the whole batch.
pub fn validate_batch(documents: Vec<ManifestDocument>) -> Result<Vec<Manifest>> {
    let manifests = documents
        .into_iter()
        .map(Manifest::from_document)
        .collect::<Result<Vec<_>>>()?;
    ensure_unique(&manifests)?;
    Ok(manifests)
}

/// Reject a batch that declares the same module twice.
pub fn ensure_unique(manifests: &[Manifest]) -> Result<()> {
    let mut names = HashSet::with_capacity(manifests.len());
    for manifest in manifests {
        if !names.insert(manifest.name()) {
            return Err(Error::DuplicateModule {
                name: manifest.name().to_string(),
            });
        }
    }
    Ok(())
}
