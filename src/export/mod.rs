//! Export functionality
//!
//! Builds the canonical node tree of each document type and emits it as YAML:
//! - Module streams (metadata versions 1 and 2)
//! - Module defaults
//!
//! Key order, scalar styles and sequence styles are fixed per field so that
//! output is byte-stable.

pub mod defaults;
pub mod stream;

use thiserror::Error;

use crate::yaml::EmitError;

/// Error during export
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Cannot emit a document without '{0}'")]
    MissingField(&'static str),
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),
}

pub use defaults::DefaultsExporter;
pub use stream::StreamExporter;
