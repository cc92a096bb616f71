use crate::error::{DecodeError, EncodeError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// The per-call validation contract for one settings value.
///
/// `decode` and `encode` are pure; a codec holds no state about the values
/// it has seen. Implementations must satisfy
/// `encode(&decode(v)?)? == v` for every `v` that decodes.
pub trait Codec {
    /// The typed form this codec produces.
    type Output;

    /// Validates and converts a stored value into its typed form.
    fn decode(&self, raw: &Value) -> Result<Self::Output, DecodeError>;

    /// Converts a typed value back into its storable form.
    fn encode(&self, value: &Self::Output) -> Result<Value, EncodeError>;
}

/// A codec for any serde-capable type.
///
/// Decode failures surface the serde error message; callers that need
/// field-level diagnostics use [`Shape`](crate::Shape) instead.
#[derive(Debug)]
pub struct SerdeCodec<T>(PhantomData<fn() -> T>);

impl<T> SerdeCodec<T> {
    /// Creates the codec. Zero-sized; construct freely at call sites.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for SerdeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SerdeCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for SerdeCodec<T> {}

impl<T> Codec for SerdeCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    type Output = T;

    fn decode(&self, raw: &Value) -> Result<T, DecodeError> {
        serde_json::from_value(raw.clone()).map_err(|e| DecodeError::Invalid(e.to_string()))
    }

    fn encode(&self, value: &T) -> Result<Value, EncodeError> {
        serde_json::to_value(value).map_err(|e| EncodeError(e.to_string()))
    }
}
