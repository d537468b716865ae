//! Module model
//!
//! Groups every stream of one module, keyed so that iteration follows
//! stream name, version, context and arch.

use std::collections::BTreeMap;

use super::defaults::Defaults;
use super::index::IndexError;
use super::stream::{ModuleStream, StreamCommon};

/// Position of a stream inside its module
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamKey {
    pub stream_name: String,
    pub version: u64,
    pub context: String,
    pub arch: String,
}

impl StreamKey {
    fn of(stream: &ModuleStream) -> Result<Self, IndexError> {
        let stream_name = stream
            .stream_name()
            .ok_or(IndexError::MissingIdentity("stream name"))?;
        Ok(Self {
            stream_name: stream_name.to_string(),
            version: stream.version(),
            context: stream.context().unwrap_or_default().to_string(),
            arch: stream.arch().unwrap_or_default().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    name: String,
    streams: BTreeMap<StreamKey, ModuleStream>,
    defaults: Option<Defaults>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            streams: BTreeMap::new(),
            defaults: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a stream of this module.
    ///
    /// Returns `Ok(false)` when an identical stream is already present. A
    /// different stream with the same stream, version, context and arch is a
    /// [`IndexError::Duplicate`].
    pub fn add_stream(&mut self, stream: ModuleStream) -> Result<bool, IndexError> {
        let module_name = stream
            .module_name()
            .ok_or(IndexError::MissingIdentity("module name"))?;
        if module_name != self.name {
            return Err(IndexError::ModuleMismatch {
                module: self.name.clone(),
                found: module_name.to_string(),
            });
        }

        let key = StreamKey::of(&stream)?;
        match self.streams.get(&key) {
            Some(existing) if *existing == stream => Ok(false),
            Some(_) => Err(IndexError::Duplicate {
                nsvca: stream.nsvca_string().unwrap_or_default(),
            }),
            None => {
                self.streams.insert(key, stream);
                Ok(true)
            }
        }
    }

    /// All streams in canonical order
    pub fn streams(&self) -> impl Iterator<Item = &ModuleStream> {
        self.streams.values()
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Distinct stream names, sorted
    pub fn stream_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.streams.keys().map(|k| k.stream_name.as_str()).collect();
        names.dedup();
        names
    }

    pub fn streams_by_stream_name(&self, stream_name: &str) -> Vec<&ModuleStream> {
        self.streams
            .iter()
            .filter(|(key, _)| key.stream_name == stream_name)
            .map(|(_, stream)| stream)
            .collect()
    }

    pub fn stream_by_nsvca(
        &self,
        stream_name: &str,
        version: u64,
        context: Option<&str>,
        arch: Option<&str>,
    ) -> Option<&ModuleStream> {
        self.streams.get(&StreamKey {
            stream_name: stream_name.to_string(),
            version,
            context: context.unwrap_or_default().to_string(),
            arch: arch.unwrap_or_default().to_string(),
        })
    }

    pub fn remove_streams_by_stream_name(&mut self, stream_name: &str) {
        self.streams.retain(|key, _| key.stream_name != stream_name);
    }

    pub(crate) fn streams_mut(&mut self) -> impl Iterator<Item = &mut ModuleStream> {
        self.streams.values_mut()
    }

    pub fn defaults(&self) -> Option<&Defaults> {
        self.defaults.as_ref()
    }

    /// Attach defaults; they must name this module.
    pub fn set_defaults(&mut self, defaults: Option<Defaults>) -> Result<(), IndexError> {
        if let Some(d) = &defaults
            && d.module_name != self.name
        {
            return Err(IndexError::DefaultsMismatch {
                module: self.name.clone(),
                defaults: d.module_name.clone(),
            });
        }
        self.defaults = defaults;
        Ok(())
    }
}
