//! Runtime value validation for Runlab settings.
//!
//! Settings are stored as untyped JSON; every read and write goes through a
//! caller-supplied [`Codec`] that checks the value's shape and converts
//! between the typed and storable forms. This crate defines:
//! - [`Codec`] — the per-call decode/encode contract
//! - [`SerdeCodec`] — a typed codec for any serde-capable type
//! - [`Shape`] / [`ObjectShape`] — runtime shape descriptors for values
//!   whose structure is only known dynamically
//! - [`DecodeError`] / [`EncodeError`] — the validation error taxonomy
//!
//! Codecs are passed explicitly at each call site and never stored next to
//! the values they validate.

mod codec;
mod error;
mod shape;

pub use codec::{Codec, SerdeCodec};
pub use error::{DecodeError, DecodeResult, EncodeError};
pub use shape::{ObjectShape, Shape};
