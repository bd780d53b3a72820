//! Error types for forge-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from forge-core
    #[error(transparent)]
    Core(#[from] forge_core::Error),

    /// Error from forge-modules
    #[error(transparent)]
    Modules(#[from] forge_modules::Error),

    /// Error from forge-query
    #[error(transparent)]
    Query(#[from] forge_query::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
