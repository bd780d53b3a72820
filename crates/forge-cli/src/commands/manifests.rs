//! Turning command-line paths into a manifest batch.

use std::path::PathBuf;

use forge_modules::{Manifest, discover_manifests, load_manifests};

use crate::error::{CliError, Result};

/// Expand directories into the manifest files they contain.
///
/// Files are kept in the order given; each directory contributes its
/// manifests sorted by file name.
pub fn collect_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(discover_manifests(path)?);
        } else {
            files.push(path.clone());
        }
    }
    if files.is_empty() {
        return Err(CliError::user("no manifest files found"));
    }
    Ok(files)
}

/// Load and validate every manifest reachable from `paths`.
pub fn load_batch(paths: &[PathBuf]) -> Result<Vec<Manifest>> {
    let files = collect_paths(paths)?;
    tracing::debug!(files = files.len(), "Loading manifests");
    Ok(load_manifests(&files)?)
}

/// One-line description of a manifest's dependencies.
pub fn describe_dependencies(manifest: &Manifest) -> String {
    if manifest.dependencies.is_empty() {
        return "-".to_string();
    }
    manifest
        .dependencies
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
