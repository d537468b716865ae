//! Document envelope classification
//!
//! Every document in a modulemd stream is a mapping with `document`,
//! `version` and `data` keys. The tag picks the payload parser and the
//! version picks the schema.

use std::fmt;

use super::ImportError;
use super::config::ParseConfig;
use super::fields::{expect_mapping, read_string, read_u64, unknown_key};
use crate::validation::ValidationError;
use crate::yaml::Node;

/// Kind of payload a document carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    ModuleStream,
    Defaults,
}

impl DocumentType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "modulemd" => Some(DocumentType::ModuleStream),
            "modulemd-defaults" => Some(DocumentType::Defaults),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            DocumentType::ModuleStream => "modulemd",
            DocumentType::Defaults => "modulemd-defaults",
        }
    }

    fn supports(self, version: u64) -> bool {
        match self {
            DocumentType::ModuleStream => (1..=2).contains(&version),
            DocumentType::Defaults => version == 1,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A classified document, payload still generic
#[derive(Debug, Clone, PartialEq)]
pub struct Subdocument {
    pub doctype: DocumentType,
    pub version: u64,
    pub data: Node,
}

/// Inspect the envelope of one document.
pub fn classify(node: &Node, config: &ParseConfig) -> Result<Subdocument, ImportError> {
    let mapping = expect_mapping(node, "document")?;

    let missing = |key: &str| ValidationError::MissingField(key.to_string());
    let tag = read_string(mapping.get("document").ok_or_else(|| missing("document"))?, "document")?;
    let version = read_u64(mapping.get("version").ok_or_else(|| missing("version"))?, "version")?;

    let doctype = DocumentType::from_tag(&tag).ok_or(ImportError::UnsupportedDocument(tag))?;
    if !doctype.supports(version) {
        return Err(ImportError::UnsupportedVersion {
            document: doctype.tag().to_string(),
            version,
        });
    }

    for key in mapping.keys() {
        if !matches!(key, "document" | "version" | "data") {
            unknown_key("document", key, config)?;
        }
    }

    let data = mapping
        .get("data")
        .cloned()
        .ok_or_else(|| missing("data"))?;

    Ok(Subdocument {
        doctype,
        version,
        data,
    })
}
