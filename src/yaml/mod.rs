//! YAML document layer
//!
//! Parses YAML text into generic [`Node`] trees and writes them back in the
//! canonical layout used for module metadata.

pub mod emitter;
pub mod node;
pub mod parser;
pub mod value;

pub use emitter::{EmitError, emit_document, emit_documents};
pub use node::{CollectionStyle, Mapping, Node, NodeKind, Scalar, ScalarStyle};
pub use parser::{DocumentStream, ParseError, parse, parse_documents};
pub use value::{ConversionError, from_node, to_node};
