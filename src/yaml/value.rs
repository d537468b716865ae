//! Conversion between generic nodes and `serde_yaml::Value`
//!
//! Lets callers keep typed data in opaque fields such as xmd.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use thiserror::Error;

use super::node::{Mapping, Node, NodeKind, Scalar};

/// Errors converting between nodes and serde values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Mapping keys must be scalars, found a {0}")]
    ComplexKey(&'static str),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl TryFrom<Value> for Node {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => Node::null(),
            Value::Bool(b) => Node::boolean(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::int(i)
                } else if let Some(u) = n.as_u64() {
                    Node::uint(u)
                } else {
                    Node::float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Node::string(s),
            Value::Sequence(items) => Node::sequence(
                items
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Mapping(map) => {
                let mut mapping = Mapping::new();
                for (key, value) in map {
                    mapping.insert(key_text(key)?, Node::try_from(value)?);
                }
                Node::Mapping(mapping)
            }
            Value::Tagged(tagged) => Node::try_from(tagged.value)?,
        })
    }
}

fn key_text(key: Value) -> Result<String, ConversionError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Sequence(_) => Err(ConversionError::ComplexKey("sequence")),
        Value::Mapping(_) => Err(ConversionError::ComplexKey("mapping")),
        Value::Tagged(tagged) => key_text(tagged.value),
    }
}

fn scalar_value(scalar: &Scalar) -> Value {
    match scalar.kind() {
        NodeKind::Null => Value::Null,
        NodeKind::Bool => Value::Bool(scalar.as_bool().unwrap_or_default()),
        NodeKind::Int => match (scalar.as_i64(), scalar.as_u64()) {
            (Some(i), _) => Value::Number(i.into()),
            (None, Some(u)) => Value::Number(u.into()),
            _ => Value::String(scalar.value().to_string()),
        },
        NodeKind::Float => match scalar.as_f64() {
            Some(f) => Value::Number(f.into()),
            None => Value::String(scalar.value().to_string()),
        },
        _ => Value::String(scalar.value().to_string()),
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Scalar(scalar) => scalar_value(scalar),
            Node::Sequence(items, _) => Value::Sequence(items.iter().map(Value::from).collect()),
            Node::Mapping(mapping) => {
                let mut map = serde_yaml::Mapping::new();
                for (key, value) in mapping.iter() {
                    map.insert(Value::String(key.to_string()), Value::from(value));
                }
                Value::Mapping(map)
            }
        }
    }
}

/// Build a node from any serializable value.
pub fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Node, ConversionError> {
    let value =
        serde_yaml::to_value(value).map_err(|e| ConversionError::Serialize(e.to_string()))?;
    Node::try_from(value)
}

/// Deserialize a typed value out of a node.
pub fn from_node<T: DeserializeOwned>(node: &Node) -> Result<T, ConversionError> {
    serde_yaml::from_value(Value::from(node))
        .map_err(|e| ConversionError::Deserialize(e.to_string()))
}
