//! Profile model
//!
//! An install profile: a named set of packages installed together.

use super::free_text;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub rpms: BTreeSet<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set or clear the description; blank text clears it.
    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = free_text(description);
    }

    pub fn add_rpm(&mut self, rpm: impl Into<String>) {
        self.rpms.insert(rpm.into());
    }

    pub fn remove_rpm(&mut self, rpm: &str) {
        self.rpms.remove(rpm);
    }

    pub fn clear_rpms(&mut self) {
        self.rpms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpms_are_deduplicated() {
        let mut profile = Profile::new("default");
        profile.add_rpm("bar");
        profile.add_rpm("bar");
        profile.add_rpm("baz");
        assert_eq!(profile.rpms.len(), 2);

        profile.remove_rpm("bar");
        assert!(profile.rpms.contains("baz"));
        assert!(!profile.rpms.contains("bar"));
    }

    #[test]
    fn test_empty_description_clears() {
        let mut profile = Profile::new("minimal");
        profile.set_description(Some("Minimal profile"));
        assert_eq!(profile.description.as_deref(), Some("Minimal profile"));
        profile.set_description(Some(""));
        assert_eq!(profile.description, None);
    }
}
