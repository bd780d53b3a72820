//! Manifest file loading.
//!
//! The document format is picked from the file extension:
//! - `.json` -> JSON
//! - `.toml` -> TOML
//! - `.yaml`, `.yml` -> YAML

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::manifest::{Manifest, ManifestDocument, validate_batch};

/// Supported manifest document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
    Yaml,
}

impl ManifestFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "json" => Some(ManifestFormat::Json),
            "toml" => Some(ManifestFormat::Toml),
            "yaml" | "yml" => Some(ManifestFormat::Yaml),
            _ => None,
        }
    }

    /// Parse a document from text in this format.
    pub fn parse(self, content: &str, path: &Path) -> Result<ManifestDocument> {
        let parse_error = |reason: String| Error::ManifestParse {
            path: path.to_path_buf(),
            reason,
        };
        match self {
            ManifestFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
            ManifestFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            ManifestFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }
}

/// Read a manifest document from disk without validating it.
pub fn read_document(path: &Path) -> Result<ManifestDocument> {
    if !path.exists() {
        return Err(Error::ManifestNotFound(path.to_path_buf()));
    }
    let format =
        ManifestFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), ?format, "Reading manifest");
    format.parse(&content, path)
}

/// Read and validate a single manifest.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    Manifest::from_document(read_document(path)?)
}

/// Read and validate a batch of manifests.
///
/// Every file is parsed before any is validated, and duplicate module names
/// across files are rejected.
pub fn load_manifests<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Manifest>> {
    let documents = paths
        .iter()
        .map(|p| read_document(p.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    validate_batch(documents)
}

/// Collect manifest files from a directory, sorted by file name.
pub fn discover_manifests(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && ManifestFormat::from_path(p).is_some())
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CRM_JSON: &str = r#"{
        "module": { "name": "crm", "version": "1.2.0" },
        "models": [{ "name": "contact", "fields": [{ "name": "name", "type": "string" }] }]
    }"#;

    const SALES_TOML: &str = r#"
dependsOn = ["crm@>=1.2.0"]

[module]
name = "sales"
version = "1.0.0"

[[models]]
name = "product"

[[models.fields]]
name = "title"
type = "string"
required = true

[[impacts]]
action = "addField"
targetModel = "contact"
field = { name = "vip", type = "boolean" }
"#;

    const BILLING_YAML: &str = r#"
module:
  name: billing
  version: "2.0.0"
dependsOn:
  - sales
impacts:
  - action: addIndex
    targetModel: product
    field: title
"#;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("a/crm.json")),
            Some(ManifestFormat::Json)
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("crm.TOML")),
            Some(ManifestFormat::Toml)
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("crm.yml")),
            Some(ManifestFormat::Yaml)
        );
        assert_eq!(ManifestFormat::from_path(Path::new("crm.txt")), None);
        assert_eq!(ManifestFormat::from_path(Path::new("crm")), None);
    }

    #[test]
    fn test_load_all_formats() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("crm.json"), CRM_JSON).unwrap();
        fs::write(tmp.path().join("sales.toml"), SALES_TOML).unwrap();
        fs::write(tmp.path().join("billing.yaml"), BILLING_YAML).unwrap();

        let paths = discover_manifests(tmp.path()).unwrap();
        assert_eq!(paths.len(), 3);

        let manifests = load_manifests(&paths).unwrap();
        let names: Vec<&str> = manifests.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["billing", "crm", "sales"]);

        let sales = manifests.iter().find(|m| m.name() == "sales").unwrap();
        assert_eq!(sales.dependencies[0].constraint(), ">=1.2.0");
        assert_eq!(sales.impacts.len(), 1);
        assert!(sales.models[0].fields[0].required);
    }

    #[test]
    fn test_missing_file() {
        let err = load_manifest(Path::new("/nonexistent/crm.json")).unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("crm.ini");
        fs::write(&path, "x").unwrap();
        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_parse_error_names_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_manifest(&path).unwrap_err();
        match err {
            Error::ManifestParse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected ManifestParse, got: {other:?}"),
        }
    }
}
