//! Module installation for Module Forge.
//!
//! This crate ties the lower layers together: manifests from
//! `forge-modules` are ordered and installed into a `forge-store` backend by
//! the [`Installer`], usually through an [`InstallSession`] that owns the
//! backend for the duration of one installation context.
//!
//! # Example
//!
//! ```
//! use forge_core::{InstallSession, InstallerConfig};
//! use forge_modules::{Manifest, ManifestDocument};
//! use forge_store::MemoryBackend;
//! use serde_json::json;
//!
//! let document: ManifestDocument = serde_json::from_value(json!({
//!     "module": { "name": "crm", "version": "1.0.0" },
//!     "models": [{ "name": "contact", "fields": [{ "name": "name", "type": "string" }] }]
//! }))
//! .unwrap();
//! let manifest = Manifest::from_document(document).unwrap();
//!
//! let mut session = InstallSession::new(Box::new(MemoryBackend::new()), InstallerConfig::default());
//! let report = session.install(vec![manifest]).unwrap();
//! assert_eq!(report.order, vec!["crm"]);
//! assert!(session.registry().is_installed("crm"));
//! ```

pub mod config;
pub mod error;
pub mod installer;
pub mod report;
pub mod session;

pub use config::InstallerConfig;
pub use error::{Error, ErrorKind, Result};
pub use installer::{INSTALL_OPERATION, Installer};
pub use report::{ImpactReport, InstallReport, ModuleReport};
pub use session::InstallSession;
