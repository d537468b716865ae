//! Module stream, metadata version 2
//!
//! Adds an ordered list of dependency sets, the rpm-map of artifact
//! checksums, and per-architecture build options.

use std::collections::BTreeMap;

use super::{MdVersion, StreamBase, StreamCommon};
use crate::models::dependencies::Dependencies;
use crate::models::rpm_map::RpmMapEntry;

/// Checksum type to checksum value to entry
pub type RpmMap = BTreeMap<String, BTreeMap<String, RpmMapEntry>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleStreamV2 {
    pub(crate) base: StreamBase,
    dependencies: Vec<Dependencies>,
    rpm_map: RpmMap,
}

impl ModuleStreamV2 {
    pub fn new(module_name: Option<&str>, stream_name: Option<&str>) -> Self {
        let mut stream = Self::default();
        stream.set_module_name(module_name);
        stream.set_stream_name(stream_name);
        stream
    }

    /// Append a dependency set. Order is significant.
    pub fn add_dependencies(&mut self, deps: Dependencies) {
        self.dependencies.push(deps);
    }

    pub fn dependencies(&self) -> &[Dependencies] {
        &self.dependencies
    }

    pub fn remove_dependencies(&mut self, deps: &Dependencies) {
        self.dependencies.retain(|d| d != deps);
    }

    pub fn clear_dependencies(&mut self) {
        self.dependencies.clear();
    }

    pub fn set_rpm_artifact_map_entry(
        &mut self,
        entry: RpmMapEntry,
        digest: impl Into<String>,
        checksum: impl Into<String>,
    ) {
        self.rpm_map
            .entry(digest.into())
            .or_default()
            .insert(checksum.into(), entry);
    }

    pub fn rpm_artifact_map_entry(&self, digest: &str, checksum: &str) -> Option<&RpmMapEntry> {
        self.rpm_map.get(digest)?.get(checksum)
    }

    pub fn rpm_artifact_map(&self) -> &RpmMap {
        &self.rpm_map
    }

    pub fn clear_rpm_artifact_map(&mut self) {
        self.rpm_map.clear();
    }
}

impl StreamCommon for ModuleStreamV2 {
    fn base(&self) -> &StreamBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StreamBase {
        &mut self.base
    }

    fn mdversion(&self) -> MdVersion {
        MdVersion::V2
    }

    fn depends_on_stream(&self, module: &str, stream: &str) -> bool {
        self.dependencies
            .iter()
            .any(|deps| deps.requires_module_and_stream(module, stream))
    }

    fn build_depends_on_stream(&self, module: &str, stream: &str) -> bool {
        self.dependencies
            .iter()
            .any(|deps| deps.buildrequires_module_and_stream(module, stream))
    }
}
