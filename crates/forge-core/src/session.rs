//! Installation sessions.
//!
//! An [`InstallSession`] owns everything one installation context needs: the
//! storage backend, the installer settings and a registry of the manifests
//! it has seen. Create one per session and drop it when done; nothing is
//! shared between sessions.

use forge_modules::{Manifest, ModuleRegistry};
use forge_query::{DynamicRecord, QueryOptions};
use forge_schema::ModelDefinition;
use forge_store::StorageBackend;
use serde_json::{Map, Value};

use crate::config::InstallerConfig;
use crate::error::Result;
use crate::installer::Installer;
use crate::report::InstallReport;

pub struct InstallSession {
    installer: Installer,
    registry: ModuleRegistry,
    backend: Box<dyn StorageBackend>,
}

impl InstallSession {
    pub fn new(backend: Box<dyn StorageBackend>, config: InstallerConfig) -> Self {
        Self {
            installer: Installer::new(config),
            registry: ModuleRegistry::new(),
            backend,
        }
    }

    /// Install a batch and remember its manifests.
    ///
    /// Modules are marked installed one by one as they appear in the report,
    /// so a failed batch leaves the registry reflecting nothing from that
    /// batch. Prior batches are unaffected.
    pub fn install(&mut self, manifests: Vec<Manifest>) -> Result<InstallReport> {
        let report = self
            .installer
            .install(manifests.clone(), self.backend.as_mut())?;

        for manifest in manifests {
            self.registry.register(manifest);
        }
        for module in report.installed() {
            self.registry.mark_installed(module.clone());
        }
        Ok(report)
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn installer(&self) -> &Installer {
        &self.installer
    }

    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn StorageBackend {
        self.backend.as_mut()
    }

    /// End the session, handing the backend back.
    pub fn into_backend(self) -> Box<dyn StorageBackend> {
        self.backend
    }

    pub fn model(&self, name: &str) -> Result<Option<ModelDefinition>> {
        Ok(self.backend.model_definition(name)?)
    }

    /// Run a query against the backend's records.
    pub fn query(&self, model: &str, options: &QueryOptions) -> Result<Vec<DynamicRecord>> {
        Ok(self.backend.records(model, options)?)
    }

    pub fn create_record(&mut self, model: &str, data: Map<String, Value>) -> Result<DynamicRecord> {
        Ok(self.backend.create_record(model, data)?)
    }
}

impl std::fmt::Debug for InstallSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallSession")
            .field("installer", &self.installer)
            .field("backend", &self.backend.name())
            .field("modules", &self.registry.module_names())
            .finish()
    }
}
