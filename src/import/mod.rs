//! Import functionality
//!
//! Turns modulemd YAML into typed models:
//! - YAML text is read into generic nodes
//! - Each document is classified by its `document`/`version` envelope
//! - The payload is read by the stream (v1, v2) or defaults parser
//!
//! A failing document does not abort a multi-document import; its error is
//! reported alongside the documents that were read.

pub mod config;
pub mod defaults;
mod fields;
pub mod stream;
pub mod subdocument;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::defaults::Defaults;
use crate::models::stream::{MdVersion, ModuleStream};
use crate::validation::ValidationError;
use crate::yaml::{Node, ParseError, parse_documents};

pub use config::{ParseConfig, ParseConfigBuilder, Strictness};
pub use defaults::parse_defaults;
pub use stream::StreamParser;
pub use subdocument::{DocumentType, Subdocument, classify};

/// Error during import
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("Unsupported document type '{0}'")]
    UnsupportedDocument(String),
    #[error("Unsupported version {version} for document type '{document}'")]
    UnsupportedVersion { document: String, version: u64 },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Expected exactly one document, found {0}")]
    DocumentCount(usize),
    #[error("Expected a '{expected}' document, found '{found}'")]
    WrongDocumentType {
        expected: DocumentType,
        found: DocumentType,
    },
}

/// A document of a multi-document stream that could not be imported
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Document {index}: {error}")]
pub struct SubdocumentError {
    /// Zero-based position in the YAML stream
    pub index: usize,
    pub error: ImportError,
}

/// Result of a multi-document import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub streams: Vec<ModuleStream>,
    pub defaults: Vec<Defaults>,
    /// Documents that failed, in stream order
    pub errors: Vec<SubdocumentError>,
}

/// Reader of modulemd YAML
#[derive(Debug, Clone, Default)]
pub struct ModulemdImporter {
    config: ParseConfig,
}

impl ModulemdImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Import every document of a YAML stream.
    ///
    /// Documents after a YAML syntax error cannot be recovered; the error is
    /// reported at the index of the document that failed.
    pub fn import(&self, yaml: &str) -> ImportResult {
        let documents = parse_documents(yaml);
        let mut result = ImportResult::default();

        for (index, node) in documents.documents.iter().enumerate() {
            match self.import_node(node) {
                Ok(Imported::Stream(stream)) => result.streams.push(stream),
                Ok(Imported::Defaults(defaults)) => result.defaults.push(defaults),
                Err(error) => {
                    debug!("Document {} failed to import: {}", index, error);
                    result.errors.push(SubdocumentError { index, error });
                }
            }
        }
        if let Some(err) = documents.error {
            result.errors.push(SubdocumentError {
                index: err.document,
                error: err.into(),
            });
        }

        info!(
            "Imported {} streams and {} defaults ({} failed documents)",
            result.streams.len(),
            result.defaults.len(),
            result.errors.len()
        );
        result
    }

    /// Import a text holding exactly one `modulemd` document.
    pub fn import_stream(&self, yaml: &str) -> Result<ModuleStream, ImportError> {
        match self.import_single(yaml)? {
            Imported::Stream(stream) => Ok(stream),
            Imported::Defaults(_) => Err(ImportError::WrongDocumentType {
                expected: DocumentType::ModuleStream,
                found: DocumentType::Defaults,
            }),
        }
    }

    /// Import a text holding exactly one `modulemd-defaults` document.
    pub fn import_defaults(&self, yaml: &str) -> Result<Defaults, ImportError> {
        match self.import_single(yaml)? {
            Imported::Defaults(defaults) => Ok(defaults),
            Imported::Stream(_) => Err(ImportError::WrongDocumentType {
                expected: DocumentType::Defaults,
                found: DocumentType::ModuleStream,
            }),
        }
    }

    fn import_single(&self, yaml: &str) -> Result<Imported, ImportError> {
        let documents = parse_documents(yaml).into_result()?;
        match documents.as_slice() {
            [node] => self.import_node(node),
            [] => Err(ImportError::DocumentCount(0)),
            many => Err(ImportError::DocumentCount(many.len())),
        }
    }

    fn import_node(&self, node: &Node) -> Result<Imported, ImportError> {
        let doc = classify(node, &self.config)?;
        match doc.doctype {
            DocumentType::ModuleStream => {
                let version = MdVersion::from_u64(doc.version).ok_or_else(|| {
                    ImportError::UnsupportedVersion {
                        document: doc.doctype.tag().to_string(),
                        version: doc.version,
                    }
                })?;
                let stream = StreamParser::new(version, &self.config).parse(&doc.data)?;
                Ok(Imported::Stream(stream))
            }
            DocumentType::Defaults => {
                Ok(Imported::Defaults(parse_defaults(&doc.data, &self.config)?))
            }
        }
    }
}

enum Imported {
    Stream(ModuleStream),
    Defaults(Defaults),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stream::StreamCommon;

    const TWO_DOCS: &str = "---
document: modulemd
version: 2
data:
  name: foo
  stream: bar
  summary: s
  description: d
  license:
    module: [MIT]
...
---
document: modulemd-defaults
version: 1
data:
  module: foo
  stream: bar
...
";

    #[test]
    fn test_import_mixed_documents() {
        let result = ModulemdImporter::new().import(TWO_DOCS);
        assert!(result.errors.is_empty());
        assert_eq!(result.streams.len(), 1);
        assert_eq!(result.defaults.len(), 1);
        assert_eq!(result.streams[0].module_name(), Some("foo"));
    }

    #[test]
    fn test_import_stream_rejects_defaults() {
        let yaml = "document: modulemd-defaults\nversion: 1\ndata: {module: foo}\n";
        assert!(matches!(
            ModulemdImporter::new().import_stream(yaml),
            Err(ImportError::WrongDocumentType { .. })
        ));
    }

    #[test]
    fn test_import_stream_counts_documents() {
        assert!(matches!(
            ModulemdImporter::new().import_stream(TWO_DOCS),
            Err(ImportError::DocumentCount(2))
        ));
        assert!(matches!(
            ModulemdImporter::new().import_stream(""),
            Err(ImportError::DocumentCount(0))
        ));
    }

    #[test]
    fn test_failed_document_is_reported_by_index() {
        let yaml = "---\ndocument: modulemd\nversion: 9\ndata: {}\n...\n---\ndocument: modulemd-defaults\nversion: 1\ndata: {module: foo}\n...\n";
        let result = ModulemdImporter::new().import(yaml);
        assert_eq!(result.defaults.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].index, 0);
    }
}
