//! Module installation.
//!
//! [`Installer::install`] runs a batch through these steps:
//!
//! 1. Resolve the installation order, rejecting duplicate module names.
//!    Every [`Manifest`] was already validated structurally when it was
//!    built. Nothing has touched the backend yet, so a failure here leaves
//!    storage untouched.
//! 2. Initialise the backend.
//! 3. For each module, in order: open a transaction, register its models,
//!    apply its impacts, commit. A failing impact or a strict commit failure
//!    rolls the module back and aborts the batch; modules committed before
//!    it stay installed.
//!
//! Transaction control, managed-schema upserts and change logging are
//! best-effort. A backend that reports them as unsupported is fine; a real
//! failure is logged and ignored unless
//! [`InstallerConfig::strict_bookkeeping`] is set.

use forge_modules::{Manifest, ModuleDescriptor, resolve_order};
use forge_store::{ImpactOutcome, StorageBackend};

use crate::config::InstallerConfig;
use crate::error::{Error, Result};
use crate::report::{ImpactReport, InstallReport, ModuleReport};

/// Label recorded in the schema change log for installer-driven changes.
pub const INSTALL_OPERATION: &str = "install";

/// Installs manifest batches into a [`StorageBackend`].
#[derive(Debug, Clone, Default)]
pub struct Installer {
    config: InstallerConfig,
}

impl Installer {
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Validate, order and install a batch.
    ///
    /// # Errors
    ///
    /// Pre-flight failures (duplicate modules, missing dependencies, version
    /// mismatches, cycles) are returned before any backend call. After that,
    /// the first failing module aborts the batch.
    pub fn install(
        &self,
        manifests: Vec<Manifest>,
        backend: &mut dyn StorageBackend,
    ) -> Result<InstallReport> {
        let ordered = resolve_order(manifests)?;

        let mut report = InstallReport {
            order: ordered.iter().map(|m| m.name().to_string()).collect(),
            modules: Vec::with_capacity(ordered.len()),
            dry_run: self.config.dry_run,
        };

        if self.config.dry_run {
            tracing::info!(order = ?report.order, "Dry run, backend left untouched");
            return Ok(report);
        }

        backend.init()?;
        tracing::debug!(backend = backend.name(), modules = ordered.len(), "Installing batch");

        for manifest in &ordered {
            let module_report = self.install_module(manifest, backend)?;
            tracing::info!(
                module = %manifest.module,
                models = module_report.models.len(),
                applied = module_report.applied(),
                "Installed module"
            );
            report.modules.push(module_report);
        }

        Ok(report)
    }

    /// Install one module inside its own transaction scope.
    fn install_module(
        &self,
        manifest: &Manifest,
        backend: &mut dyn StorageBackend,
    ) -> Result<ModuleReport> {
        let module = &manifest.module;
        let transactional =
            self.best_effort(module, "begin_transaction", backend.begin_transaction())?;

        match self.apply_module(manifest, backend, transactional) {
            Ok(report) => {
                if transactional {
                    if let Err(err) = self.best_effort(module, "commit", backend.commit()) {
                        Self::rollback(module, backend);
                        return Err(err);
                    }
                }
                Ok(report)
            }
            Err(err) => {
                if transactional {
                    Self::rollback(module, backend);
                }
                Err(err)
            }
        }
    }

    fn apply_module(
        &self,
        manifest: &Manifest,
        backend: &mut dyn StorageBackend,
        transactional: bool,
    ) -> Result<ModuleReport> {
        let module = &manifest.module;
        let mut report = ModuleReport {
            module: module.clone(),
            models: Vec::with_capacity(manifest.models.len()),
            impacts: Vec::with_capacity(manifest.impacts.len()),
            transactional,
        };

        for model in &manifest.models {
            backend
                .register_model(model)
                .map_err(|source| Error::ModelRegistration {
                    module: module.name.clone(),
                    model: model.name.clone(),
                    source,
                })?;
            tracing::debug!(module = %module.name, model = %model.name, "Registered model");

            if self.config.track_managed_schema {
                self.best_effort(
                    module,
                    "upsert_managed_schema",
                    backend.upsert_managed_schema(&model.name, module),
                )?;
            }
            report.models.push(model.name.clone());
        }

        for impact in &manifest.impacts {
            let outcome =
                backend
                    .apply_impact(module, impact)
                    .map_err(|source| Error::ImpactApplication {
                        module: module.name.clone(),
                        impact: impact.describe(),
                        source,
                    })?;
            tracing::debug!(
                module = %module.name,
                action = %impact.action(),
                model = %impact.target_model(),
                ?outcome,
                "Applied impact"
            );

            if outcome == ImpactOutcome::Applied && self.config.log_schema_changes {
                self.best_effort(
                    module,
                    "log_schema_change",
                    backend.log_schema_change(
                        impact.target_model(),
                        impact,
                        module,
                        INSTALL_OPERATION,
                    ),
                )?;
            }

            report.impacts.push(ImpactReport {
                impact: impact.describe(),
                outcome,
            });
        }

        Ok(report)
    }

    /// Settle a best-effort call. Returns whether it succeeded.
    fn best_effort(
        &self,
        module: &ModuleDescriptor,
        operation: &'static str,
        result: forge_store::Result<()>,
    ) -> Result<bool> {
        match result {
            Ok(()) => Ok(true),
            Err(err) if err.is_unsupported() => {
                tracing::debug!(module = %module.name, operation, "Not supported by backend");
                Ok(false)
            }
            Err(source) if self.config.strict_bookkeeping => Err(Error::Bookkeeping {
                module: module.name.clone(),
                operation,
                source,
            }),
            Err(err) => {
                tracing::warn!(module = %module.name, operation, error = %err, "Ignoring backend failure");
                Ok(false)
            }
        }
    }

    /// Roll back after a failure. Never replaces the original error.
    fn rollback(module: &ModuleDescriptor, backend: &mut dyn StorageBackend) {
        match backend.rollback() {
            Ok(()) => tracing::debug!(module = %module.name, "Rolled back module"),
            Err(err) if err.is_unsupported() => {}
            Err(err) => {
                tracing::warn!(module = %module.name, error = %err, "Rollback failed");
            }
        }
    }
}
