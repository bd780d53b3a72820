//! Shared test utilities for the Module Forge workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each rebuild the same manifests. It is a dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`fixtures`] - manifest builders and the stock `crm` / `sales` modules
//! - [`backend`] - [`RecordingBackend`], a call journal with fault injection
//! - [`workspace`] - [`ManifestDir`], a temporary directory of manifest files

pub mod backend;
pub mod fixtures;
pub mod workspace;

pub use backend::RecordingBackend;
pub use fixtures::{
    ManifestBuilder, contact_model, crm_builder, crm_manifest, product_model, sales_builder,
    sales_manifest,
};
pub use workspace::ManifestDir;
