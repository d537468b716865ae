//! Validation functionality
//!
//! Provides the error type shared by the schema readers and the cross-field
//! checks run on a parsed stream:
//! - Component build ordering (buildorder/buildafter exclusivity, references, cycles)
//! - Component architectures against the stream's build architectures

pub mod components;

use thiserror::Error;

use crate::models::stream::{ModuleStream, StreamCommon};
use crate::yaml::NodeKind;

pub use components::{validate_arches, validate_build_ordering};

/// A document or stream that breaks a schema rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' must be a {expected}, found a {actual}")]
    UnexpectedKind {
        field: String,
        expected: NodeKind,
        actual: NodeKind,
    },
    #[error("Missing required field '{0}'")]
    MissingField(String),
    #[error("Unknown key '{key}' in '{field}'")]
    UnknownKey { field: String, key: String },
    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Component '{component}' sets both buildorder and buildafter")]
    BuildOrderConflict { component: String },
    #[error("Component '{buildafter}' uses buildafter while '{buildorder}' uses buildorder")]
    MixedBuildScheme {
        buildafter: String,
        buildorder: String,
    },
    #[error("Component '{component}' builds after unknown component '{dependency}'")]
    UnknownBuildAfter {
        component: String,
        dependency: String,
    },
    #[error("Build-after cycle between components: {}", .components.join(", "))]
    BuildAfterCycle { components: Vec<String> },
    #[error("Component '{component}' is restricted to arch '{arch}' missing from buildopts arches")]
    ArchNotInBuildopts { component: String, arch: String },
    #[error("rpm-map entry '{checksum}' declares nevra '{declared}' but describes '{derived}'")]
    NevraMismatch {
        checksum: String,
        declared: String,
        derived: String,
    },
}

/// Run every cross-field check on a stream.
pub fn validate_stream(stream: &ModuleStream) -> Result<(), ValidationError> {
    validate_build_ordering(stream.rpm_components())?;
    validate_build_ordering(stream.module_components())?;
    validate_arches(stream.buildopts(), stream.rpm_components())?;
    Ok(())
}
