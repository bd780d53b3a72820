//! Error types for forge-store

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by storage backends
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The backend does not implement this operation at all.
    ///
    /// Callers may treat this as a no-op; every other variant is a real
    /// failure.
    #[error("Operation not supported by this backend: {operation}")]
    Unsupported { operation: &'static str },

    /// No model with this name is registered
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    /// No record with this id exists in the model's table
    #[error("Record '{id}' not found in model '{model}'")]
    RecordNotFound { model: String, id: String },

    /// Record data rejected against the model definition
    #[error("Invalid record for model '{model}': {reason}")]
    Validation { model: String, reason: String },

    /// Transaction control used out of order
    #[error("Transaction error: {reason}")]
    Transaction { reason: String },

    /// Failure reported by the underlying storage
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Schema error from forge-schema
    #[error(transparent)]
    Schema(#[from] forge_schema::Error),

    /// Query error from forge-query
    #[error(transparent)]
    Query(#[from] forge_query::Error),
}

impl Error {
    pub fn unsupported(operation: &'static str) -> Self {
        Error::Unsupported { operation }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported { .. })
    }

    /// True for a missing model or record, including unknown models
    /// reported by the query engine.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ModelNotFound { .. }
                | Error::RecordNotFound { .. }
                | Error::Query(forge_query::Error::UnknownModel { .. })
        )
    }
}
