//! Dependencies model
//!
//! One set of build-time and run-time requirements. Each module maps to the
//! streams it may be satisfied by; an empty set means any stream, and a
//! stream prefixed with `-` excludes that stream.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// True for a stream entry that excludes rather than selects.
pub fn is_negated(stream: &str) -> bool {
    stream.starts_with('-')
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependencies {
    #[serde(default)]
    buildtime: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    runtime: BTreeMap<String, BTreeSet<String>>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_buildtime_stream(&mut self, module: impl Into<String>, stream: impl Into<String>) {
        self.buildtime
            .entry(module.into())
            .or_default()
            .insert(stream.into());
    }

    /// Require `module` at build time without naming a stream.
    pub fn set_empty_buildtime_dependencies_for_module(&mut self, module: impl Into<String>) {
        self.buildtime.insert(module.into(), BTreeSet::new());
    }

    pub fn buildtime_modules(&self) -> Vec<&str> {
        self.buildtime.keys().map(String::as_str).collect()
    }

    pub fn buildtime_streams(&self, module: &str) -> Option<&BTreeSet<String>> {
        self.buildtime.get(module)
    }

    pub fn buildtime(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.buildtime
    }

    pub fn remove_buildtime_module(&mut self, module: &str) {
        self.buildtime.remove(module);
    }

    pub fn clear_buildtime(&mut self) {
        self.buildtime.clear();
    }

    pub fn add_runtime_stream(&mut self, module: impl Into<String>, stream: impl Into<String>) {
        self.runtime
            .entry(module.into())
            .or_default()
            .insert(stream.into());
    }

    /// Require `module` at run time without naming a stream.
    pub fn set_empty_runtime_dependencies_for_module(&mut self, module: impl Into<String>) {
        self.runtime.insert(module.into(), BTreeSet::new());
    }

    pub fn runtime_modules(&self) -> Vec<&str> {
        self.runtime.keys().map(String::as_str).collect()
    }

    pub fn runtime_streams(&self, module: &str) -> Option<&BTreeSet<String>> {
        self.runtime.get(module)
    }

    pub fn runtime(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.runtime
    }

    pub fn remove_runtime_module(&mut self, module: &str) {
        self.runtime.remove(module);
    }

    pub fn clear_runtime(&mut self) {
        self.runtime.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.buildtime.is_empty() && self.runtime.is_empty()
    }

    /// Whether `stream` of `module` is explicitly listed at build time.
    pub fn buildrequires_module_and_stream(&self, module: &str, stream: &str) -> bool {
        Self::lists(&self.buildtime, module, stream)
    }

    /// Whether `stream` of `module` is explicitly listed at run time.
    pub fn requires_module_and_stream(&self, module: &str, stream: &str) -> bool {
        Self::lists(&self.runtime, module, stream)
    }

    fn lists(map: &BTreeMap<String, BTreeSet<String>>, module: &str, stream: &str) -> bool {
        !is_negated(stream) && map.get(module).is_some_and(|streams| streams.contains(stream))
    }
}
