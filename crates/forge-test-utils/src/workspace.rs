//! [`ManifestDir`]: manifest files in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory for manifest, config and record files.
///
/// # Example
///
/// ```rust
/// use forge_test_utils::ManifestDir;
///
/// let dir = ManifestDir::new();
/// let path = dir.write("crm.toml", "[module]\nname = \"crm\"\nversion = \"1.0.0\"\n");
/// assert!(path.exists());
/// ```
pub struct ManifestDir {
    temp_dir: TempDir,
}

impl Default for ManifestDir {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("ManifestDir::new: failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` under the root and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("ManifestDir::write: failed to create parent");
        }
        fs::write(&path, content).expect("ManifestDir::write: failed to write file");
        path
    }

    /// Serialize `value` as pretty JSON into `name`.
    pub fn write_json(&self, name: &str, value: &serde_json::Value) -> PathBuf {
        let content =
            serde_json::to_string_pretty(value).expect("ManifestDir::write_json: serialize");
        self.write(name, &content)
    }
}
