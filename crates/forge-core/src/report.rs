//! Installation reports.

use forge_modules::ModuleDescriptor;
use forge_store::ImpactOutcome;
use serde::Serialize;

/// Result of applying one impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactReport {
    /// Label such as `addField contact.email`.
    pub impact: String,
    pub outcome: ImpactOutcome,
}

/// What installing one module did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    pub module: ModuleDescriptor,
    /// Models registered, in declaration order.
    pub models: Vec<String>,
    pub impacts: Vec<ImpactReport>,
    /// Whether the module ran inside a backend transaction.
    pub transactional: bool,
}

impl ModuleReport {
    pub fn applied(&self) -> usize {
        self.impacts
            .iter()
            .filter(|i| i.outcome == ImpactOutcome::Applied)
            .count()
    }
}

/// Summary of a whole batch, in installation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Modules in resolved order.
    pub order: Vec<String>,
    /// Per-module results. Empty for a dry run.
    pub modules: Vec<ModuleReport>,
    pub dry_run: bool,
}

impl InstallReport {
    pub fn installed(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter().map(|m| &m.module)
    }

    pub fn applied_impacts(&self) -> usize {
        self.modules.iter().map(ModuleReport::applied).sum()
    }

    pub fn unchanged_impacts(&self) -> usize {
        self.modules
            .iter()
            .map(|m| m.impacts.len() - m.applied())
            .sum()
    }
}
