//! Conversion between flat attribute maps and SQS message attributes.
//!
//! SQS carries custom message attributes as typed values (`DataType` plus a
//! string or binary payload). This adapter only ever produces and consumes the
//! `String` data type, so an [`AttributeMap`] is a plain string-to-string map
//! and [`encode`] / [`decode`] are exact inverses of each other.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::errors::QueueError;

/// SQS data type tag used for every encoded attribute.
pub const STRING_DATA_TYPE: &str = "String";

/// Custom message attributes as a flat string-to-string map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap(HashMap<String, String>);

impl AttributeMap {
    pub fn new() -> Self {
        AttributeMap(HashMap::new())
    }

    /// Inserts an attribute, returning the previous value for the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the underlying map.
    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for AttributeMap {
    fn from(map: HashMap<String, String>) -> Self {
        AttributeMap(map)
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        AttributeMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, String);
    type IntoIter = std::collections::hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Builds an attribute map from a JSON object.
///
/// Every value must be a JSON string. Anything else (numbers, booleans,
/// `null`, arrays, nested objects) fails with
/// [`QueueError::InvalidAttribute`] naming the offending key.
impl TryFrom<Map<String, Value>> for AttributeMap {
    type Error = QueueError;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        object
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(value) => Ok((name, value)),
                other => Err(QueueError::InvalidAttribute {
                    name,
                    found: json_kind(&other),
                }),
            })
            .collect()
    }
}

impl TryFrom<Value> for AttributeMap {
    type Error = QueueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(object) => AttributeMap::try_from(object),
            // `null` stands for "no attributes".
            Value::Null => Ok(AttributeMap::new()),
            other => Err(QueueError::InvalidAttributes {
                found: json_kind(&other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One message attribute as SQS represents it on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireAttribute {
    pub data_type: String,
    pub string_value: String,
}

impl WireAttribute {
    /// Creates a `String` typed attribute.
    pub fn string(value: impl Into<String>) -> Self {
        WireAttribute {
            data_type: STRING_DATA_TYPE.to_string(),
            string_value: value.into(),
        }
    }
}

/// Message attributes keyed by name, in SQS wire form.
pub type WireAttributeList = HashMap<String, WireAttribute>;

/// Converts an attribute map into SQS message attributes.
///
/// Every attribute is tagged with the `String` data type and keeps its value
/// unchanged.
pub fn encode(attrs: &AttributeMap) -> WireAttributeList {
    attrs
        .0
        .iter()
        .map(|(name, value)| (name.clone(), WireAttribute::string(value.as_str())))
        .collect()
}

/// Converts SQS message attributes back into an attribute map, dropping the
/// data type tags.
pub fn decode(wire: &WireAttributeList) -> AttributeMap {
    wire.iter()
        .map(|(name, attr)| (name.clone(), attr.string_value.clone()))
        .collect()
}
