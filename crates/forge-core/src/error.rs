//! Error types for forge-core

use std::fmt;
use std::path::PathBuf;

/// Result type for forge-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while installing modules
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Applying an impact failed; the module's transaction was rolled back
    #[error("module '{module}' failed to apply {impact}: {source}")]
    ImpactApplication {
        module: String,
        impact: String,
        #[source]
        source: forge_store::Error,
    },

    /// Registering one of the module's own models failed
    #[error("module '{module}' failed to register model '{model}': {source}")]
    ModelRegistration {
        module: String,
        model: String,
        #[source]
        source: forge_store::Error,
    },

    /// A best-effort call failed while strict bookkeeping was enabled
    #[error("module '{module}': {operation} failed: {source}")]
    Bookkeeping {
        module: String,
        operation: &'static str,
        #[source]
        source: forge_store::Error,
    },

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Manifest or ordering error from forge-modules
    #[error(transparent)]
    Modules(#[from] forge_modules::Error),

    /// Storage error from forge-store
    #[error(transparent)]
    Store(#[from] forge_store::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of every error the installer can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad manifest shape, unsafe identifier, unknown impact action.
    Validation,
    MissingDependency,
    VersionMismatch,
    CyclicDependency,
    /// A backend failure while applying an impact.
    ImpactApplication,
    /// A model or record is absent.
    NotFound,
    Storage,
    Config,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::MissingDependency => "missing-dependency",
            ErrorKind::VersionMismatch => "version-mismatch",
            ErrorKind::CyclicDependency => "cyclic-dependency",
            ErrorKind::ImpactApplication => "impact-application",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Storage => "storage",
            ErrorKind::Config => "config",
        }
    }

    /// True for kinds that are always raised before any backend call.
    pub fn is_preflight(self) -> bool {
        matches!(
            self,
            ErrorKind::Validation
                | ErrorKind::MissingDependency
                | ErrorKind::VersionMismatch
                | ErrorKind::CyclicDependency
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use forge_modules::Error as M;

        match self {
            Error::ImpactApplication { .. } => ErrorKind::ImpactApplication,
            Error::ModelRegistration { source, .. } | Error::Bookkeeping { source, .. } => {
                store_kind(source)
            }
            Error::Config { .. } => ErrorKind::Config,
            Error::Modules(err) => match err {
                M::MissingDependency { .. } => ErrorKind::MissingDependency,
                M::VersionMismatch { .. } => ErrorKind::VersionMismatch,
                M::DependencyCycle { .. } => ErrorKind::CyclicDependency,
                M::ManifestNotFound(_) => ErrorKind::NotFound,
                M::Io(_) => ErrorKind::Storage,
                M::Schema(_)
                | M::InvalidManifest { .. }
                | M::InvalidDependency { .. }
                | M::DuplicateModule { .. }
                | M::UnsupportedFormat(_)
                | M::ManifestParse { .. } => ErrorKind::Validation,
            },
            Error::Store(err) => store_kind(err),
            Error::Io(_) => ErrorKind::Storage,
        }
    }
}

fn store_kind(err: &forge_store::Error) -> ErrorKind {
    match err {
        err if err.is_not_found() => ErrorKind::NotFound,
        forge_store::Error::Schema(_) | forge_store::Error::Validation { .. } => {
            ErrorKind::Validation
        }
        _ => ErrorKind::Storage,
    }
}
