//! Build options model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Options passed to the build system for the whole stream
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Buildopts {
    /// RPM macros, one definition per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpm_macros: Option<String>,
    /// Binary packages allowed to be built from this stream's sources
    #[serde(default)]
    pub rpm_whitelist: BTreeSet<String>,
    /// Architectures the stream is built for; empty means all
    #[serde(default)]
    pub arches: BTreeSet<String>,
}

impl Buildopts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rpm_macros.is_none() && self.rpm_whitelist.is_empty() && self.arches.is_empty()
    }

    pub fn set_rpm_macros(&mut self, macros: Option<&str>) {
        self.rpm_macros = macros.filter(|m| !m.is_empty()).map(str::to_string);
    }

    pub fn add_rpm_to_whitelist(&mut self, rpm: impl Into<String>) {
        self.rpm_whitelist.insert(rpm.into());
    }

    pub fn remove_rpm_from_whitelist(&mut self, rpm: &str) {
        self.rpm_whitelist.remove(rpm);
    }

    pub fn add_arch(&mut self, arch: impl Into<String>) {
        self.arches.insert(arch.into());
    }

    pub fn remove_arch(&mut self, arch: &str) {
        self.arches.remove(arch);
    }
}
