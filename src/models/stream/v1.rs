//! Module stream, metadata version 1
//!
//! The legacy layout: a single map of build-time and a single map of run-time
//! requirements, each naming exactly one stream per module.

use std::collections::BTreeMap;

use super::{MdVersion, StreamBase, StreamCommon};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleStreamV1 {
    pub(crate) base: StreamBase,
    buildtime_requirements: BTreeMap<String, String>,
    runtime_requirements: BTreeMap<String, String>,
}

impl ModuleStreamV1 {
    pub fn new(module_name: Option<&str>, stream_name: Option<&str>) -> Self {
        let mut stream = Self::default();
        stream.set_module_name(module_name);
        stream.set_stream_name(stream_name);
        stream
    }

    /// Require `stream` of `module` at build time, replacing any previous stream.
    pub fn add_buildtime_requirement(
        &mut self,
        module: impl Into<String>,
        stream: impl Into<String>,
    ) {
        self.buildtime_requirements.insert(module.into(), stream.into());
    }

    pub fn remove_buildtime_requirement(&mut self, module: &str) {
        self.buildtime_requirements.remove(module);
    }

    pub fn clear_buildtime_requirements(&mut self) {
        self.buildtime_requirements.clear();
    }

    pub fn buildtime_requirement_stream(&self, module: &str) -> Option<&str> {
        self.buildtime_requirements.get(module).map(String::as_str)
    }

    pub fn buildtime_requirements(&self) -> &BTreeMap<String, String> {
        &self.buildtime_requirements
    }

    /// Require `stream` of `module` at run time, replacing any previous stream.
    pub fn add_runtime_requirement(
        &mut self,
        module: impl Into<String>,
        stream: impl Into<String>,
    ) {
        self.runtime_requirements.insert(module.into(), stream.into());
    }

    pub fn remove_runtime_requirement(&mut self, module: &str) {
        self.runtime_requirements.remove(module);
    }

    pub fn clear_runtime_requirements(&mut self) {
        self.runtime_requirements.clear();
    }

    pub fn runtime_requirement_stream(&self, module: &str) -> Option<&str> {
        self.runtime_requirements.get(module).map(String::as_str)
    }

    pub fn runtime_requirements(&self) -> &BTreeMap<String, String> {
        &self.runtime_requirements
    }
}

impl StreamCommon for ModuleStreamV1 {
    fn base(&self) -> &StreamBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StreamBase {
        &mut self.base
    }

    fn mdversion(&self) -> MdVersion {
        MdVersion::V1
    }

    fn depends_on_stream(&self, module: &str, stream: &str) -> bool {
        self.runtime_requirement_stream(module) == Some(stream)
    }

    fn build_depends_on_stream(&self, module: &str, stream: &str) -> bool {
        self.buildtime_requirement_stream(module) == Some(stream)
    }
}
