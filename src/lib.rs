//! modulemd - module metadata for modular RPM repositories
//!
//! Provides:
//! - A generic YAML node layer with a canonical, libyaml-compatible emitter
//! - Parsers for `modulemd` (versions 1 and 2) and `modulemd-defaults` documents
//! - Typed stream models with cross-field validation
//! - Upgrades from metadata version 1 to 2
//! - A module index that aggregates streams and defaults and dumps them
//!   in a deterministic order

pub mod convert;
pub mod export;
pub mod import;
pub mod models;
pub mod validation;
pub mod yaml;

// Re-export commonly used types
pub use convert::UpgradeError;
pub use export::{DefaultsExporter, ExportError, StreamExporter};
pub use import::{
    ImportError, ImportResult, ModulemdImporter, ParseConfig, Strictness, SubdocumentError,
};
pub use models::{
    Buildopts, Component, Defaults, Dependencies, IndexError, MdVersion, Module, ModuleComponent,
    ModuleIndex, ModuleStream, ModuleStreamV1, ModuleStreamV2, Profile, RpmComponent, RpmMapEntry,
    ServiceLevel, StreamCommon,
};
pub use validation::ValidationError;
pub use yaml::{Node, ParseError};
