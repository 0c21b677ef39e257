//! One JSON value slot: a sequence of scalars or a sequence of objects.

use serde_json::Value;

use crate::errors::{ModelError, ProtocolError};
use crate::model::Object;

const SCALAR: &str = "scalar";
const COMPLEX: &str = "complex";

/// A value accepted by [`Field::add_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A scalar; numbers and booleans are carried in their JSON text form.
    String(String),
    /// A nested object.
    Object(Object),
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Object> for FieldValue {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

/// One named slot of an [`Object`].
///
/// The shape is fixed at construction: a scalar field only ever holds
/// strings, a complex field only ever holds objects. Adding or reading a value
/// of the other shape fails with [`ModelError::TypeMismatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Ordered string values.
    Scalar(Vec<String>),
    /// Ordered nested objects.
    Complex(Vec<Object>),
}

impl Field {
    /// Creates an empty field of the given shape.
    pub fn new(is_complex: bool) -> Self {
        if is_complex {
            Self::Complex(Vec::new())
        } else {
            Self::Scalar(Vec::new())
        }
    }

    /// Creates a scalar field holding one value.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(vec![value.into()])
    }

    /// Creates a complex field holding one object.
    pub fn complex(value: Object) -> Self {
        Self::Complex(vec![value])
    }

    /// Returns `true` if this field holds objects.
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(values) => values.len(),
            Self::Complex(values) => values.len(),
        }
    }

    /// Returns `true` if no values have been added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if more than one value has been added.
    pub fn is_multivalued(&self) -> bool {
        self.len() > 1
    }

    /// Appends a value of this field's shape.
    pub fn add_value(&mut self, value: impl Into<FieldValue>) -> Result<(), ModelError> {
        match (self, value.into()) {
            (Self::Scalar(values), FieldValue::String(v)) => values.push(v),
            (Self::Complex(values), FieldValue::Object(v)) => values.push(v),
            (Self::Scalar(_), FieldValue::Object(_)) => {
                return Err(mismatch(COMPLEX, SCALAR));
            }
            (Self::Complex(_), FieldValue::String(_)) => {
                return Err(mismatch(SCALAR, COMPLEX));
            }
        }
        Ok(())
    }

    /// First string value.
    pub fn string_value(&self) -> Result<&str, ModelError> {
        self.string_values()?
            .first()
            .map(String::as_str)
            .ok_or(ModelError::EmptyField)
    }

    /// All string values, empty if none were added.
    pub fn string_values(&self) -> Result<&[String], ModelError> {
        match self {
            Self::Scalar(values) => Ok(values),
            Self::Complex(_) => Err(mismatch(SCALAR, COMPLEX)),
        }
    }

    /// First object value. A scalar field cannot yield an object.
    pub fn value(&self) -> Result<&Object, ModelError> {
        self.values()?.first().ok_or(ModelError::EmptyField)
    }

    /// All object values, empty if none were added.
    pub fn values(&self) -> Result<&[Object], ModelError> {
        match self {
            Self::Complex(values) => Ok(values),
            Self::Scalar(_) => Err(mismatch(COMPLEX, SCALAR)),
        }
    }

    /// Serializes back to JSON: a single value becomes a plain JSON value,
    /// several become an array.
    pub fn to_json(&self) -> Value {
        match self.to_json_array() {
            Value::Array(mut items) if items.len() == 1 => items.remove(0),
            other => other,
        }
    }

    /// Serializes back to JSON as an array regardless of the value count.
    pub fn to_json_array(&self) -> Value {
        Value::Array(match self {
            Self::Scalar(values) => values.iter().cloned().map(Value::String).collect(),
            Self::Complex(values) => values.iter().map(Object::to_json).collect(),
        })
    }

    /// Builds a field from a JSON node. `null` maps to `None` (absent field).
    ///
    /// Nested arrays are flattened. An array mixing objects and scalars has no
    /// field representation and is rejected.
    pub(crate) fn from_json(value: &Value) -> Result<Option<Self>, ProtocolError> {
        let field = match value {
            Value::Null => return Ok(None),
            Value::Object(map) => Self::complex(Object::from_json_map(map)?),
            Value::Array(items) => {
                let mut flat = Vec::with_capacity(items.len());
                flatten(items, &mut flat);
                let objects = flat.iter().filter(|v| v.is_object()).count();
                if objects == 0 {
                    Self::Scalar(flat.iter().filter_map(|v| scalar_text(v)).collect())
                } else if objects == flat.len() {
                    let mut values = Vec::with_capacity(flat.len());
                    for item in flat {
                        if let Value::Object(map) = item {
                            values.push(Object::from_json_map(map)?);
                        }
                    }
                    Self::Complex(values)
                } else {
                    return Err(ProtocolError::UnexpectedShape(
                        "array mixes objects and scalars".into(),
                    ));
                }
            }
            other => match scalar_text(other) {
                Some(text) => Self::scalar(text),
                None => return Ok(None),
            },
        };
        Ok(Some(field))
    }
}

fn mismatch(expected: &'static str, found: &'static str) -> ModelError {
    ModelError::TypeMismatch { expected, found }
}

fn flatten<'a>(items: &'a [Value], out: &mut Vec<&'a Value>) {
    for item in items {
        match item {
            Value::Array(inner) => flatten(inner, out),
            Value::Null => {}
            other => out.push(other),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
