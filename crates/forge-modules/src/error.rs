use std::path::PathBuf;

/// Errors that can occur while reading, validating and ordering manifests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A model, field or impact failed schema validation.
    #[error(transparent)]
    Schema(#[from] forge_schema::Error),

    /// The manifest is structurally invalid.
    #[error("invalid manifest for module '{module}': {reason}")]
    InvalidManifest { module: String, reason: String },

    /// A dependency expression could not be parsed.
    #[error("invalid dependency expression '{expression}': {reason}")]
    InvalidDependency { expression: String, reason: String },

    /// Two manifests in one batch declare the same module name.
    #[error("module '{name}' appears more than once in the batch")]
    DuplicateModule { name: String },

    /// A declared dependency is not part of the batch.
    #[error("module '{dependent}' depends on '{dependency}', which is not in the batch")]
    MissingDependency {
        dependency: String,
        dependent: String,
    },

    /// A dependency is present but its version does not satisfy the constraint.
    #[error(
        "module '{dependent}' requires '{dependency}' {constraint}, but version {actual} was provided"
    )]
    VersionMismatch {
        dependency: String,
        dependent: String,
        constraint: String,
        actual: String,
    },

    /// The dependency graph contains a cycle.
    #[error("dependency cycle detected among: {}", participants.join(", "))]
    DependencyCycle { participants: Vec<String> },

    /// Manifest file not found at the expected path.
    #[error("manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// The file extension does not name a supported format.
    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Failed to parse a manifest document.
    #[error("failed to parse manifest {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    /// I/O error reading manifest files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
