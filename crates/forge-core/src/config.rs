//! Installer configuration
//!
//! Read from the `[installer]` table of a TOML file:
//!
//! ```toml
//! [installer]
//! strict_bookkeeping = false
//! track_managed_schema = true
//! log_schema_changes = true
//! dry_run = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Knobs controlling how [`Installer`](crate::Installer) treats its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Fail the module when a best-effort call (transaction control,
    /// managed-schema upsert, change logging) fails for a reason other than
    /// being unsupported.
    pub strict_bookkeeping: bool,
    /// Record which module owns each registered model.
    pub track_managed_schema: bool,
    /// Append an entry to the backend's schema change log for every impact
    /// that changed something.
    pub log_schema_changes: bool,
    /// Validate and resolve only; never touch the backend.
    pub dry_run: bool,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            strict_bookkeeping: false,
            track_managed_schema: true,
            log_schema_changes: true,
            dry_run: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    installer: InstallerConfig,
}

impl InstallerConfig {
    /// Parse the `[installer]` table out of TOML text.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(file.installer)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No installer config, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content, path)
    }
}
