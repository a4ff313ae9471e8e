//! Error types for the YANG runtime

use thiserror::Error;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Runtime errors
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Schema resolution failed: {0}")]
    SchemaResolution(String),

    #[error("Structural error: {0}")]
    Structural(String),

    #[error("Unsupported serializer format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid schema model: {0}")]
    InvalidModel(String),

    #[error("Field access failed: {0}")]
    Field(#[from] FieldError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl RuntimeError {
    pub(crate) fn resolution(message: impl Into<String>) -> Self {
        Self::SchemaResolution(message.into())
    }

    pub(crate) fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub(crate) fn invalid_model(message: impl Into<String>) -> Self {
        Self::InvalidModel(message.into())
    }
}

/// Errors raised by generated accessors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Accessor for {expected} applied to an object of type {actual}")]
    WrongTarget { expected: &'static str, actual: String },

    #[error("Value {value} cannot be stored as {expected}")]
    InvalidValue { value: String, expected: &'static str },

    #[error("Object of type {actual} cannot be stored in {field}")]
    WrongObject { field: &'static str, actual: String },
}
