//! Registry of validated manifests.
//!
//! A registry belongs to one installation session. It keeps the manifests
//! that passed validation (for diagnostics and reporting) and remembers which
//! of them were installed, in order.

use std::collections::HashMap;

use crate::manifest::{Manifest, ModuleDescriptor};

/// Registry of manifests seen during a session.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    manifests: HashMap<String, Manifest>,
    installed: Vec<ModuleDescriptor>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validated manifest, replacing any previous one of the same name.
    pub fn register(&mut self, manifest: Manifest) {
        self.manifests.insert(manifest.module.name.clone(), manifest);
    }

    pub fn get(&self, name: &str) -> Option<&Manifest> {
        self.manifests.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.manifests.contains_key(name)
    }

    /// Record that a module finished installing.
    pub fn mark_installed(&mut self, module: ModuleDescriptor) {
        self.installed.retain(|m| m.name != module.name);
        self.installed.push(module);
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.iter().any(|m| m.name == name)
    }

    /// Installed modules in installation order.
    pub fn installed(&self) -> &[ModuleDescriptor] {
        &self.installed
    }

    /// All registered module names (sorted).
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.manifests.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}
