//! Module defaults model
//!
//! The `modulemd-defaults` document: which stream of a module is the
//! default, and which profiles are installed by default for each stream.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Defaults {
    pub module_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_stream: Option<String>,
    /// Stream name to default profile names
    #[serde(default)]
    pub profiles: BTreeMap<String, BTreeSet<String>>,
}

impl Defaults {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            default_stream: None,
            profiles: BTreeMap::new(),
        }
    }

    pub fn set_default_stream(&mut self, stream: Option<&str>) {
        self.default_stream = stream.filter(|s| !s.is_empty()).map(str::to_string);
    }

    pub fn add_default_profile_for_stream(
        &mut self,
        stream: impl Into<String>,
        profile: impl Into<String>,
    ) {
        self.profiles
            .entry(stream.into())
            .or_default()
            .insert(profile.into());
    }

    /// Declare that a stream has no default profiles.
    pub fn set_empty_default_profiles_for_stream(&mut self, stream: impl Into<String>) {
        self.profiles.insert(stream.into(), BTreeSet::new());
    }

    pub fn default_profiles_for_stream(&self, stream: &str) -> Option<&BTreeSet<String>> {
        self.profiles.get(stream)
    }
}
