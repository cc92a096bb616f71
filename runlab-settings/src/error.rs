//! Error types for the settings layer.

use runlab_codec::{DecodeError, EncodeError};
use runlab_types::SettingsPath;
use thiserror::Error;

/// Result type for store operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A stored value does not match the requested codec.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A value could not be converted to its storable form.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The operation needs a current value and none is loaded.
    #[error("no value loaded at `{0}`")]
    NotLoaded(SettingsPath),

    /// The remote settings service failed.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}

/// Result type for remote service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur talking to the remote settings service.
///
/// Service errors never roll back a local write; they are reported to the
/// store's error sink and the local state stays authoritative.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("unexpected HTTP status {status}: {body}")]
    Http { status: u16, body: String },

    /// Malformed service payload.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The session is not authorized for settings operations.
    #[error("unauthorized")]
    Unauthorized,

    /// Timeout.
    #[error("operation timed out")]
    Timeout,
}
