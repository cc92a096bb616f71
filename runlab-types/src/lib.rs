//! Core type definitions for the Runlab client.
//!
//! This crate defines the fundamental types shared by the client-side
//! settings subsystem:
//! - User identifiers (UUID v7)
//! - Settings paths (one logical settings value per path)
//! - The [`Loadable`] tri-state read wrapper
//!
//! Domain-specific value shapes (chart configs, table layouts, pane sizes,
//! etc.) belong to their feature areas, not here.

mod ids;
mod loadable;

pub use ids::{SettingsPath, UserId};
pub use loadable::Loadable;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid settings path: {0}")]
    InvalidPath(String),
}
