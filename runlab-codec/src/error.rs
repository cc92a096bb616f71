//! Error types for codec operations.
//!
//! Decode failures are plain data: they are carried inside `Loadable`
//! results and compared structurally in tests, so both error types are
//! `Clone + PartialEq`.

use thiserror::Error;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// A stored value does not match the shape the caller asked for.
///
/// Recoverable: readers treat it as an explicit error state of the read,
/// never as a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The value at `pointer` has the wrong JSON type.
    #[error("type mismatch at `{pointer}`: expected {expected}, found {found}")]
    Mismatch {
        /// JSON pointer to the offending location ("" is the root).
        pointer: String,
        expected: String,
        found: String,
    },

    /// A required object field is absent.
    #[error("missing required field `{field}` at `{pointer}`")]
    MissingField { pointer: String, field: String },

    /// No variant of a union shape matched.
    #[error("no union variant matched at `{pointer}`")]
    NoUnionMatch { pointer: String },

    /// The value failed typed deserialization.
    #[error("invalid value: {0}")]
    Invalid(String),
}

/// A typed value could not be converted to its storable JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("encode error: {0}")]
pub struct EncodeError(pub String);
