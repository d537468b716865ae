//! Generic document node
//!
//! Every YAML document is turned into a [`Node`] tree before any schema reader
//! looks at it, and every emitter renders one back out. Scalars keep their
//! literal text so that values such as a stream called `1.10` survive a
//! parse/emit cycle unchanged; the YAML 1.2 core schema decides their kind.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static NULL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:~|null|Null|NULL)?$").unwrap());

static BOOL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:true|True|TRUE|false|False|FALSE)$").unwrap());

static INT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-+]?[0-9]+|0o[0-7]+|0x[0-9a-fA-F]+)$").unwrap());

static FLOAT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
    )
    .unwrap()
});

/// Presentation hint carried by a scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    /// Let the emitter choose; strings that would read back as another kind get quoted
    #[default]
    Any,
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// Presentation hint carried by a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionStyle {
    #[default]
    Block,
    Flow,
}

/// Resolved kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Sequence,
    Mapping,
}

impl NodeKind {
    /// Resolve the kind of a plain scalar with the YAML 1.2 core schema
    pub fn resolve(text: &str) -> Self {
        if NULL_REGEX.is_match(text) {
            NodeKind::Null
        } else if BOOL_REGEX.is_match(text) {
            NodeKind::Bool
        } else if INT_REGEX.is_match(text) {
            NodeKind::Int
        } else if FLOAT_REGEX.is_match(text) {
            NodeKind::Float
        } else {
            NodeKind::String
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Null => write!(f, "null"),
            NodeKind::Bool => write!(f, "boolean"),
            NodeKind::Int => write!(f, "integer"),
            NodeKind::Float => write!(f, "float"),
            NodeKind::String => write!(f, "string"),
            NodeKind::Sequence => write!(f, "sequence"),
            NodeKind::Mapping => write!(f, "mapping"),
        }
    }
}

/// A scalar value with its literal text
#[derive(Debug, Clone)]
pub struct Scalar {
    value: String,
    kind: NodeKind,
    style: ScalarStyle,
}

impl Scalar {
    /// A scalar read from plain text; its kind is resolved from the text.
    pub fn plain(text: impl Into<String>) -> Self {
        let value = text.into();
        let kind = NodeKind::resolve(&value);
        Self {
            value,
            kind,
            style: ScalarStyle::Plain,
        }
    }

    /// A string scalar, whatever its text looks like.
    pub fn string(text: impl Into<String>) -> Self {
        Self {
            value: text.into(),
            kind: NodeKind::String,
            style: ScalarStyle::Any,
        }
    }

    pub fn null() -> Self {
        Self {
            value: "null".to_string(),
            kind: NodeKind::Null,
            style: ScalarStyle::Plain,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            value: value.to_string(),
            kind: NodeKind::Bool,
            style: ScalarStyle::Plain,
        }
    }

    pub fn int(value: i64) -> Self {
        Self {
            value: value.to_string(),
            kind: NodeKind::Int,
            style: ScalarStyle::Plain,
        }
    }

    pub fn uint(value: u64) -> Self {
        Self {
            value: value.to_string(),
            kind: NodeKind::Int,
            style: ScalarStyle::Plain,
        }
    }

    pub fn float(value: f64) -> Self {
        let value = if value.is_nan() {
            ".nan".to_string()
        } else if value.is_infinite() {
            if value > 0.0 { ".inf" } else { "-.inf" }.to_string()
        } else {
            format!("{value:?}")
        };
        Self {
            value,
            kind: NodeKind::Float,
            style: ScalarStyle::Plain,
        }
    }

    /// Replace the presentation hint, keeping text and kind.
    pub fn with_style(mut self, style: ScalarStyle) -> Self {
        self.style = style;
        self
    }

    pub(crate) fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Literal text of the scalar
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn style(&self) -> ScalarStyle {
        self.style
    }

    pub fn as_bool(&self) -> Option<bool> {
        if self.kind != NodeKind::Bool {
            return None;
        }
        Some(self.value.eq_ignore_ascii_case("true"))
    }

    pub fn as_i64(&self) -> Option<i64> {
        if self.kind != NodeKind::Int {
            return None;
        }
        let text = self.value.strip_prefix('+').unwrap_or(&self.value);
        if let Some(hex) = text.strip_prefix("0x") {
            i64::from_str_radix(hex, 16).ok()
        } else if let Some(oct) = text.strip_prefix("0o") {
            i64::from_str_radix(oct, 8).ok()
        } else {
            text.parse().ok()
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        if self.kind != NodeKind::Int {
            return None;
        }
        let text = self.value.strip_prefix('+').unwrap_or(&self.value);
        if let Some(hex) = text.strip_prefix("0x") {
            u64::from_str_radix(hex, 16).ok()
        } else if let Some(oct) = text.strip_prefix("0o") {
            u64::from_str_radix(oct, 8).ok()
        } else {
            text.parse().ok()
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Int => self.as_i64().map(|v| v as f64),
            NodeKind::Float => {
                let text = self.value.trim_start_matches('+');
                match text {
                    ".inf" | ".Inf" | ".INF" => Some(f64::INFINITY),
                    "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
                    ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
                    _ => text.parse().ok(),
                }
            }
            _ => None,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        // every spelling of null is the same value
        self.kind == NodeKind::Null || self.value == other.value
    }
}

/// Insertion-ordered mapping with string keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert a value. An existing key keeps its position and the old value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

/// A node of the generic document tree
#[derive(Debug, Clone)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>, CollectionStyle),
    Mapping(Mapping),
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::null())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Node::Scalar(Scalar::string(text))
    }

    /// A string emitted without quotes whenever the syntax allows it.
    pub fn plain(text: impl Into<String>) -> Self {
        Node::Scalar(Scalar::string(text).with_style(ScalarStyle::Plain))
    }

    /// A string emitted as a folded block scalar.
    pub fn folded(text: impl Into<String>) -> Self {
        Node::Scalar(Scalar::string(text).with_style(ScalarStyle::Folded))
    }

    pub fn boolean(value: bool) -> Self {
        Node::Scalar(Scalar::boolean(value))
    }

    pub fn int(value: i64) -> Self {
        Node::Scalar(Scalar::int(value))
    }

    pub fn uint(value: u64) -> Self {
        Node::Scalar(Scalar::uint(value))
    }

    pub fn float(value: f64) -> Self {
        Node::Scalar(Scalar::float(value))
    }

    pub fn sequence(items: Vec<Node>) -> Self {
        Node::Sequence(items, CollectionStyle::Block)
    }

    pub fn flow_sequence(items: Vec<Node>) -> Self {
        Node::Sequence(items, CollectionStyle::Flow)
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(scalar) => scalar.kind(),
            Node::Sequence(..) => NodeKind::Sequence,
            Node::Mapping(_) => NodeKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == NodeKind::Null
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Literal text of a scalar node
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().map(Scalar::value)
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items, _) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Scalar(a), Node::Scalar(b)) => a == b,
            (Node::Sequence(a, _), Node::Sequence(b, _)) => a == b,
            (Node::Mapping(a), Node::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Node::Mapping(mapping)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::string(text)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::string(text)
    }
}
