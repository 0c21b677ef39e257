//! Generic extensible entity: a map from field name to [`Field`].

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::errors::{ModelError, ProtocolError};
use crate::model::{Field, FieldValue};

/// A parsed container entity with arbitrary fields.
///
/// Field names are unique; setting an existing name replaces its field.
/// Typed views such as [`crate::model::Person`] wrap an `Object` and read the
/// fields that carry domain meaning.
///
/// Fields decoded from a JSON array, or built with [`Object::push_value`],
/// are list fields and always serialize as arrays, even with one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    fields: HashMap<String, Field>,
    lists: HashSet<String>,
}

impl Object {
    /// Creates an object with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    /// Sets `name` to `field`, returning the field it replaced.
    pub fn set_field(&mut self, name: impl Into<String>, field: Field) -> Option<Field> {
        let name = name.into();
        self.lists.remove(&name);
        self.fields.insert(name, field)
    }

    /// Sets `name` to `field` and marks it as a list field.
    pub fn set_list_field(&mut self, name: impl Into<String>, field: Field) -> Option<Field> {
        let name = name.into();
        self.lists.insert(name.clone());
        self.fields.insert(name, field)
    }

    /// Appends `value` to the list field `name`, creating the field with the
    /// value's shape if absent.
    pub fn push_value(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<(), ModelError> {
        let name = name.into();
        let value = value.into();
        let field = self
            .fields
            .entry(name.clone())
            .or_insert_with(|| Field::new(matches!(value, FieldValue::Object(_))));
        field.add_value(value)?;
        self.lists.insert(name);
        Ok(())
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        self.lists.remove(name);
        self.fields.remove(name)
    }

    /// Names of all fields, in no particular order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First string value of `name`, or `None` when the field is absent,
    /// empty, or complex.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(|f| f.string_value().ok())
    }

    /// First object value of `name`, or `None` when the field is absent,
    /// empty, or scalar.
    pub fn object(&self, name: &str) -> Option<&Object> {
        self.field(name).and_then(|f| f.value().ok())
    }

    /// Replaces `name` with a single-valued scalar field.
    pub fn set_string(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set_field(name, Field::scalar(value));
    }

    /// Replaces `name` with a single-valued complex field.
    pub fn set_object(&mut self, name: impl Into<String>, value: Object) {
        self.set_field(name, Field::complex(value));
    }

    /// Decodes a JSON object. Any other JSON value is a shape violation.
    pub fn from_json(value: &Value) -> Result<Self, ProtocolError> {
        match value {
            Value::Object(map) => Self::from_json_map(map),
            other => Err(ProtocolError::UnexpectedShape(format!(
                "expected JSON object, found {}",
                json_kind(other)
            ))),
        }
    }

    pub(crate) fn from_json_map(map: &Map<String, Value>) -> Result<Self, ProtocolError> {
        let mut object = Self::new();
        for (name, value) in map {
            if let Some(field) = Field::from_json(value)? {
                if value.is_array() {
                    object.lists.insert(name.clone());
                }
                object.fields.insert(name.clone(), field);
            }
        }
        Ok(object)
    }

    /// Encodes as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, field)| {
                    let value = if self.lists.contains(name) {
                        field.to_json_array()
                    } else {
                        field.to_json()
                    };
                    (name.clone(), value)
                })
                .collect(),
        )
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
