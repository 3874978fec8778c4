//! Error types for Lodive core

use thiserror::Error;

/// Errors raised while interpreting chain data
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    #[error("Literal type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Value out of range for {ty}: {value}")]
    OutOfRange { ty: String, value: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    #[error("Invalid balance: {0}")]
    InvalidBalance(String),
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
