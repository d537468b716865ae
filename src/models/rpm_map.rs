//! RPM map entry model
//!
//! Describes one artifact of the rpm-map, keyed by checksum type and checksum
//! value on the owning stream.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RpmMapEntry {
    pub name: String,
    pub epoch: u64,
    pub version: String,
    pub release: String,
    pub arch: String,
}

impl RpmMapEntry {
    pub fn new(
        name: impl Into<String>,
        epoch: u64,
        version: impl Into<String>,
        release: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            epoch,
            version: version.into(),
            release: release.into(),
            arch: arch.into(),
        }
    }

    /// `name-epoch:version-release.arch`
    pub fn nevra(&self) -> String {
        format!(
            "{}-{}:{}-{}.{}",
            self.name, self.epoch, self.version, self.release, self.arch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nevra() {
        let entry = RpmMapEntry::new("bar", 0, "1.23", "1.module_deadbeef", "x86_64");
        assert_eq!(entry.nevra(), "bar-0:1.23-1.module_deadbeef.x86_64");
    }

    #[test]
    fn test_equality() {
        let a = RpmMapEntry::new("bar", 0, "1.23", "1", "x86_64");
        let mut b = a.clone();
        assert_eq!(a, b);
        b.epoch = 1;
        assert_ne!(a, b);
    }
}
