//! Tagged-node document form of a tree.
//!
//! ```text
//! Node := { "value": T, "color": "red"|"black", "left": Node|null, "right": Node|null }
//! ```
//!
//! `null` is the only encoding of an empty subtree. A missing field is an
//! error, never an implicit `null`.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::Color;

/// A real node in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentNode<T> {
    pub value: T,
    pub color: Color,
    pub left: Document<T>,
    pub right: Document<T>,
}

/// A subtree in document form: `None` is the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document<T>(pub Option<Box<DocumentNode<T>>>);

impl<T> Default for Document<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Document<T> {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn node(value: T, color: Color, left: Document<T>, right: Document<T>) -> Self {
        Self(Some(Box::new(DocumentNode {
            value,
            color,
            left,
            right,
        })))
    }

    pub fn red(value: T, left: Document<T>, right: Document<T>) -> Self {
        Self::node(value, Color::Red, left, right)
    }

    pub fn black(value: T, left: Document<T>, right: Document<T>) -> Self {
        Self::node(value, Color::Black, left, right)
    }

    pub fn leaf(value: T, color: Color) -> Self {
        Self::node(value, color, Self::empty(), Self::empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn root(&self) -> Option<&DocumentNode<T>> {
        self.0.as_deref()
    }
}

impl<T: DeserializeOwned> Document<T> {
    /// Parses a document from a JSON value, naming the offending field on failure.
    pub fn from_value(value: &Value) -> DomainResult<Self> {
        Self::parse(value, "$")
    }

    pub fn from_json_str(json: &str) -> DomainResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| DomainError::deserialization("$", e.to_string()))?;
        Self::from_value(&value)
    }

    fn parse(value: &Value, path: &str) -> DomainResult<Self> {
        let map = match value {
            Value::Null => return Ok(Self::empty()),
            Value::Object(map) => map,
            other => {
                return Err(DomainError::deserialization(
                    path,
                    format!("expected node object or null, found {}", kind_of(other)),
                ))
            }
        };

        let field = |name: &str| {
            map.get(name).ok_or_else(|| {
                DomainError::deserialization(format!("{path}.{name}"), "missing field")
            })
        };

        let node_value: T = serde_json::from_value(field("value")?.clone())
            .map_err(|e| DomainError::deserialization(format!("{path}.value"), e.to_string()))?;

        let color = match field("color")? {
            Value::String(tag) if tag == "red" => Color::Red,
            Value::String(tag) if tag == "black" => Color::Black,
            other => {
                return Err(DomainError::deserialization(
                    format!("{path}.color"),
                    format!("invalid color tag {other}, expected \"red\" or \"black\""),
                ))
            }
        };

        let left = Self::parse(field("left")?, &format!("{path}.left"))?;
        let right = Self::parse(field("right")?, &format!("{path}.right"))?;

        Ok(Self::node(node_value, color, left, right))
    }
}

impl<T: Serialize> Document<T> {
    pub fn to_value(&self) -> Value {
        // Serializing plain data with string keys into a Value does not fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Document<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(de::Error::custom)
    }
}

impl<T: DeserializeOwned> TryFrom<&Value> for Document<T> {
    type Error = DomainError;

    fn try_from(value: &Value) -> DomainResult<Self> {
        Self::from_value(value)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
