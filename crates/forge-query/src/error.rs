//! Error types for forge-query

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unknown model: {model}")]
    UnknownModel { model: String },

    #[error("Join source '{found}' does not match queried model '{expected}'")]
    JoinSourceMismatch { expected: String, found: String },

    #[error("Invalid filter condition '{condition}': {reason}")]
    InvalidCondition { condition: String, reason: String },

    #[error("Record source error: {message}")]
    Source { message: String },
}
