//! YAML text to generic nodes
//!
//! Drives the yaml-rust event parser and assembles one [`Node`] per document.

use std::collections::HashMap;

use thiserror::Error;
use yaml_rust::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust::scanner::{Marker, TScalarStyle, TokenType};

use super::node::{Mapping, Node, NodeKind, Scalar, ScalarStyle};

/// Malformed YAML, located by document index and position
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("YAML parse error in document {document}: {message}")]
pub struct ParseError {
    /// Zero-based index of the document that failed
    pub document: usize,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Documents read from a YAML stream
///
/// Documents completed before a syntax error are kept; the error records the
/// index of the document that could not be read.
#[derive(Debug, Clone, Default)]
pub struct DocumentStream {
    pub documents: Vec<Node>,
    pub error: Option<ParseError>,
}

impl DocumentStream {
    pub fn into_result(self) -> Result<Vec<Node>, ParseError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.documents),
        }
    }
}

/// Parse every document of a YAML stream.
pub fn parse_documents(text: &str) -> DocumentStream {
    let mut builder = NodeBuilder::default();
    let mut parser = Parser::new(text.chars());
    if let Err(err) = parser.load(&mut builder, true) {
        if builder.error.is_none() {
            let mark = err.marker();
            builder.error = Some(ParseError {
                document: builder.documents.len(),
                line: mark.line(),
                column: mark.col() + 1,
                message: err.to_string(),
            });
        }
    }
    DocumentStream {
        documents: builder.documents,
        error: builder.error,
    }
}

/// Parse a YAML text holding exactly one document.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    let mut documents = parse_documents(text).into_result()?;
    match documents.len() {
        0 => Ok(Node::null()),
        1 => Ok(documents.remove(0)),
        n => Err(ParseError {
            document: 1,
            line: 0,
            column: 0,
            message: format!("expected a single document, found {n}"),
        }),
    }
}

enum Frame {
    Sequence {
        items: Vec<Node>,
        anchor: usize,
    },
    Mapping {
        mapping: Mapping,
        key: Option<String>,
        anchor: usize,
    },
}

#[derive(Default)]
struct NodeBuilder {
    documents: Vec<Node>,
    stack: Vec<Frame>,
    root: Option<Node>,
    anchors: HashMap<usize, Node>,
    error: Option<ParseError>,
}

impl NodeBuilder {
    fn fail(&mut self, mark: Marker, message: String) {
        self.error = Some(ParseError {
            document: self.documents.len(),
            line: mark.line(),
            column: mark.col() + 1,
            message: format!("{message} at line {} column {}", mark.line(), mark.col() + 1),
        });
    }

    fn scalar(value: String, style: TScalarStyle, tag: Option<TokenType>) -> Scalar {
        let forced_string = matches!(
            &tag,
            Some(TokenType::Tag(handle, suffix)) if handle == "!!" && suffix == "str"
        );
        match style {
            TScalarStyle::Plain | TScalarStyle::Any if forced_string => {
                Scalar::plain(value).with_kind(NodeKind::String)
            }
            TScalarStyle::Plain | TScalarStyle::Any => Scalar::plain(value),
            TScalarStyle::SingleQuoted => {
                Scalar::string(value).with_style(ScalarStyle::SingleQuoted)
            }
            TScalarStyle::DoubleQuoted => {
                Scalar::string(value).with_style(ScalarStyle::DoubleQuoted)
            }
            TScalarStyle::Literal => Scalar::string(value).with_style(ScalarStyle::Literal),
            TScalarStyle::Foled => Scalar::string(value).with_style(ScalarStyle::Folded),
        }
    }

    fn complete(&mut self, node: Node, anchor: usize, mark: Marker) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        let failure = match self.stack.last_mut() {
            None => {
                self.root = Some(node);
                None
            }
            Some(Frame::Sequence { items, .. }) => {
                items.push(node);
                None
            }
            Some(Frame::Mapping { mapping, key, .. }) => match key.take() {
                Some(name) => {
                    mapping.insert(name, node);
                    None
                }
                None => match node {
                    Node::Scalar(scalar) if mapping.contains_key(scalar.value()) => {
                        Some(format!("duplicate mapping key '{}'", scalar.value()))
                    }
                    Node::Scalar(scalar) => {
                        *key = Some(scalar.value().to_string());
                        None
                    }
                    other => Some(format!("mapping keys must be scalars, found a {}", other.kind())),
                },
            },
        };
        if let Some(message) = failure {
            self.fail(mark, message);
        }
    }
}

impl MarkedEventReceiver for NodeBuilder {
    fn on_event(&mut self, event: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        match event {
            Event::DocumentStart => {
                self.root = None;
                self.stack.clear();
                self.anchors.clear();
            }
            Event::DocumentEnd => {
                let root = self.root.take().unwrap_or_else(Node::null);
                self.documents.push(root);
            }
            Event::Scalar(value, style, anchor, tag) => {
                let scalar = Self::scalar(value, style, tag);
                self.complete(Node::Scalar(scalar), anchor, mark);
            }
            Event::SequenceStart(anchor) => self.stack.push(Frame::Sequence {
                items: Vec::new(),
                anchor,
            }),
            Event::MappingStart(anchor) => self.stack.push(Frame::Mapping {
                mapping: Mapping::new(),
                key: None,
                anchor,
            }),
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence { items, anchor }) => {
                    self.complete(Node::sequence(items), anchor, mark)
                }
                Some(Frame::Mapping {
                    mapping, anchor, ..
                }) => self.complete(Node::Mapping(mapping), anchor, mark),
                None => self.fail(mark, "unbalanced collection end".to_string()),
            },
            Event::Alias(id) => match self.anchors.get(&id).cloned() {
                Some(node) => self.complete(node, 0, mark),
                None => self.fail(mark, format!("unknown anchor reference {id}")),
            },
            Event::StreamStart | Event::StreamEnd | Event::Nothing => {}
        }
    }
}
