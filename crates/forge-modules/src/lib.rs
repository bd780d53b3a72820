//! Module manifests for Module Forge.
//!
//! This crate provides manifest parsing and validation, version constraint
//! evaluation, dependency resolution into an installation order, and a
//! registry of validated manifests.

pub mod dependency;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod registry;
pub mod version;

pub use dependency::{DependencyGraph, resolve_order};
pub use error::{Error, Result};
pub use loader::{ManifestFormat, discover_manifests, load_manifest, load_manifests, read_document};
pub use manifest::{Manifest, ManifestDocument, ModuleDescriptor, ensure_unique, validate_batch};
pub use registry::ModuleRegistry;
pub use version::{Comparator, DependencySpec, DottedVersion};
