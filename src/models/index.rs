//! Module index
//!
//! The top-level collection: every known module with its streams and
//! defaults, and the entry points for bulk import and canonical dump.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use super::defaults::Defaults;
use super::module::Module;
use super::stream::{MdVersion, ModuleStream, StreamCommon};
use crate::convert::UpgradeError;
use crate::export::{DefaultsExporter, ExportError, StreamExporter};
use crate::import::{ModulemdImporter, ParseConfig, SubdocumentError};
use crate::yaml::emit_documents;

/// Errors raised while adding to an index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("A different stream {nsvca} is already present")]
    Duplicate { nsvca: String },
    #[error("Stream has no {0}")]
    MissingIdentity(&'static str),
    #[error("Stream of module '{found}' added to module '{module}'")]
    ModuleMismatch { module: String, found: String },
    #[error("Defaults for module '{defaults}' attached to module '{module}'")]
    DefaultsMismatch { module: String, defaults: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleIndex {
    modules: BTreeMap<String, Module>,
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stream, creating its module on first use.
    ///
    /// Re-adding an identical stream is a no-op returning `Ok(false)`.
    pub fn add_stream(&mut self, stream: ModuleStream) -> Result<bool, IndexError> {
        let name = stream
            .module_name()
            .ok_or(IndexError::MissingIdentity("module name"))?
            .to_string();
        if stream.stream_name().is_none() {
            return Err(IndexError::MissingIdentity("stream name"));
        }
        self.modules
            .entry(name.clone())
            .or_insert_with(|| Module::new(name))
            .add_stream(stream)
    }

    /// Attach defaults to their module, replacing earlier defaults.
    pub fn add_defaults(&mut self, defaults: Defaults) -> Result<(), IndexError> {
        let name = defaults.module_name.clone();
        self.modules
            .entry(name.clone())
            .or_insert_with(|| Module::new(name))
            .set_defaults(Some(defaults))
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn remove_module(&mut self, name: &str) -> Option<Module> {
        self.modules.remove(name)
    }

    pub fn stream_count(&self) -> usize {
        self.modules.values().map(Module::stream_count).sum()
    }

    /// Import every document of a YAML stream.
    ///
    /// Good documents are added even when others fail; the failures are
    /// returned with their document index. Adding a conflicting stream aborts
    /// with the index error.
    pub fn update_from_str(
        &mut self,
        yaml: &str,
        config: &ParseConfig,
    ) -> Result<Vec<SubdocumentError>, IndexError> {
        let result = ModulemdImporter::with_config(config.clone()).import(yaml);
        for stream in result.streams {
            self.add_stream(stream)?;
        }
        for defaults in result.defaults {
            self.add_defaults(defaults)?;
        }
        for failure in &result.errors {
            warn!("Skipping subdocument {}: {}", failure.index, failure.error);
        }
        Ok(result.errors)
    }

    /// Upgrade every stream to `target`, leaving streams already there untouched.
    pub fn upgrade_streams(&mut self, target: u64) -> Result<(), UpgradeError> {
        let version = MdVersion::from_u64(target).ok_or(UpgradeError::UnknownVersion(target))?;
        for module in self.modules.values_mut() {
            for stream in module.streams_mut() {
                if stream.mdversion() < version {
                    *stream = stream.upgrade(target)?;
                }
            }
        }
        Ok(())
    }

    /// Emit every stream and defaults document in canonical order.
    ///
    /// Modules are ordered by name; within a module, streams come first in
    /// stream, version, context and arch order, followed by the defaults.
    pub fn dump_to_string(&self) -> Result<String, ExportError> {
        let stream_exporter = StreamExporter::new();
        let defaults_exporter = DefaultsExporter::new();
        let mut documents = Vec::new();
        for module in self.modules.values() {
            for stream in module.streams() {
                documents.push(stream_exporter.to_node(stream)?);
            }
            if let Some(defaults) = module.defaults() {
                documents.push(defaults_exporter.to_node(defaults)?);
            }
        }
        Ok(emit_documents(&documents)?)
    }
}
