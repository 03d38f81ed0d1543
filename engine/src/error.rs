//! Error types for the Summit engine.

use thiserror::Error;

/// All possible errors from the Summit engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Filter compilation errors
    #[error("filter contains invalid field or operator: {0}")]
    InvalidFilter(String),

    #[error("inequality filter is allowed on only one field")]
    MultipleInequalityFields,

    #[error("filter requires field, operator, and value")]
    IncompleteFilter,

    // Entity construction errors
    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    // State transition errors
    #[error("{0}")]
    Conflict(String),

    #[error("no entity found with key: {0}")]
    NotFound(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
