//! Runtime shape descriptors.
//!
//! Feature areas that only know a value's structure dynamically (user
//! tables, chart configs, plugin panes) describe it with a [`Shape`]
//! instead of a concrete Rust type. A shape checks the structural minimum:
//! listed fields must match, unknown fields are tolerated.

use crate::codec::Codec;
use crate::error::{DecodeError, EncodeError};
use serde_json::Value;
use std::collections::BTreeMap;

/// A runtime description of a JSON value's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    Number,
    Bool,
    Null,
    /// Matches anything, including null.
    Any,
    /// A homogeneous array.
    Array(Box<Shape>),
    /// The inner shape or null.
    Nullable(Box<Shape>),
    /// Any one of the variants.
    Union(Vec<Shape>),
    /// An object with required and optional fields.
    Object(ObjectShape),
}

impl Shape {
    /// Shorthand for an array of `inner`.
    #[must_use]
    pub fn array(inner: Shape) -> Self {
        Self::Array(Box::new(inner))
    }

    /// Shorthand for `inner` or null.
    #[must_use]
    pub fn nullable(inner: Shape) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// Shorthand for a union of variants.
    #[must_use]
    pub fn union(variants: impl IntoIterator<Item = Shape>) -> Self {
        Self::Union(variants.into_iter().collect())
    }

    /// Checks a value against this shape.
    ///
    /// Reports the JSON pointer of the first offending location.
    pub fn check(&self, value: &Value) -> Result<(), DecodeError> {
        self.check_at(value, "")
    }

    fn check_at(&self, value: &Value, pointer: &str) -> Result<(), DecodeError> {
        match self {
            Self::Any => Ok(()),
            Self::String if value.is_string() => Ok(()),
            Self::Number if value.is_number() => Ok(()),
            Self::Bool if value.is_boolean() => Ok(()),
            Self::Null if value.is_null() => Ok(()),
            Self::Array(inner) => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        inner.check_at(item, &format!("{pointer}/{i}"))?;
                    }
                    Ok(())
                }
                None => Err(self.mismatch(value, pointer)),
            },
            Self::Nullable(inner) => {
                if value.is_null() {
                    Ok(())
                } else {
                    inner.check_at(value, pointer)
                }
            }
            Self::Union(variants) => {
                if variants.iter().any(|v| v.check_at(value, pointer).is_ok()) {
                    Ok(())
                } else {
                    Err(DecodeError::NoUnionMatch {
                        pointer: pointer.to_string(),
                    })
                }
            }
            Self::Object(object) => object.check_at(value, pointer),
            _ => Err(self.mismatch(value, pointer)),
        }
    }

    fn mismatch(&self, value: &Value, pointer: &str) -> DecodeError {
        DecodeError::Mismatch {
            pointer: pointer.to_string(),
            expected: self.expected(),
            found: json_type_name(value).to_string(),
        }
    }

    /// Human-readable name of the shape, used in mismatch errors.
    #[must_use]
    pub fn expected(&self) -> String {
        match self {
            Self::String => "string".into(),
            Self::Number => "number".into(),
            Self::Bool => "boolean".into(),
            Self::Null => "null".into(),
            Self::Any => "any".into(),
            Self::Array(inner) => format!("array of {}", inner.expected()),
            Self::Nullable(inner) => format!("{} | null", inner.expected()),
            Self::Union(variants) => variants
                .iter()
                .map(Shape::expected)
                .collect::<Vec<_>>()
                .join(" | "),
            Self::Object(_) => "object".into(),
        }
    }
}

/// An object shape with required and optional fields.
///
/// The required/optional split expresses intersection types: a value must
/// carry every required field, may carry any optional field, and may carry
/// fields the shape does not mention at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectShape {
    required: BTreeMap<String, Shape>,
    optional: BTreeMap<String, Shape>,
}

impl ObjectShape {
    /// Creates an empty object shape (matches any object).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required field.
    #[must_use]
    pub fn required(mut self, field: impl Into<String>, shape: Shape) -> Self {
        self.required.insert(field.into(), shape);
        self
    }

    /// Adds an optional field.
    #[must_use]
    pub fn optional(mut self, field: impl Into<String>, shape: Shape) -> Self {
        self.optional.insert(field.into(), shape);
        self
    }

    fn check_at(&self, value: &Value, pointer: &str) -> Result<(), DecodeError> {
        let Some(object) = value.as_object() else {
            return Err(DecodeError::Mismatch {
                pointer: pointer.to_string(),
                expected: "object".into(),
                found: json_type_name(value).to_string(),
            });
        };

        for (field, shape) in &self.required {
            match object.get(field) {
                Some(v) => shape.check_at(v, &format!("{pointer}/{}", escape_pointer(field)))?,
                None => {
                    return Err(DecodeError::MissingField {
                        pointer: pointer.to_string(),
                        field: field.clone(),
                    });
                }
            }
        }

        for (field, shape) in &self.optional {
            if let Some(v) = object.get(field) {
                shape.check_at(v, &format!("{pointer}/{}", escape_pointer(field)))?;
            }
        }

        Ok(())
    }
}

impl From<ObjectShape> for Shape {
    fn from(object: ObjectShape) -> Self {
        Self::Object(object)
    }
}

/// Shapes are codecs over raw JSON: decode validates, encode is identity.
impl Codec for Shape {
    type Output = Value;

    fn decode(&self, raw: &Value) -> Result<Value, DecodeError> {
        self.check(raw)?;
        Ok(raw.clone())
    }

    fn encode(&self, value: &Value) -> Result<Value, EncodeError> {
        Ok(value.clone())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// JSON pointer escaping per RFC 6901.
fn escape_pointer(field: &str) -> String {
    field.replace('~', "~0").replace('/', "~1")
}
