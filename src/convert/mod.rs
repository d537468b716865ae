//! Metadata version upgrades
//!
//! Streams only move forward: a v1 stream becomes a v2 stream whose single
//! dependency set carries the v1 requirement maps. Every other field is
//! shared between the versions and copied as is.

use thiserror::Error;
use tracing::debug;

use crate::models::dependencies::Dependencies;
use crate::models::stream::{MdVersion, ModuleStream, ModuleStreamV1, ModuleStreamV2, StreamCommon};

/// A requested upgrade that cannot be performed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("Unknown metadata version {0}")]
    UnknownVersion(u64),
    #[error("Cannot downgrade from metadata version {from} to {to}")]
    Downgrade { from: u64, to: u64 },
}

/// Produce a copy of `stream` in metadata version `target`.
pub fn upgrade(stream: &ModuleStream, target: u64) -> Result<ModuleStream, UpgradeError> {
    let target_version = MdVersion::from_u64(target).ok_or(UpgradeError::UnknownVersion(target))?;
    let current = stream.mdversion();
    if target_version < current {
        return Err(UpgradeError::Downgrade {
            from: current.as_u64(),
            to: target,
        });
    }

    debug!(
        "Upgrading {} from version {} to {}",
        stream.nsvca_string().unwrap_or_default(),
        current,
        target_version
    );
    match (stream, target_version) {
        (ModuleStream::V1(v1), MdVersion::V2) => Ok(ModuleStream::V2(v1_to_v2(v1))),
        _ => Ok(stream.clone()),
    }
}

fn v1_to_v2(v1: &ModuleStreamV1) -> ModuleStreamV2 {
    let mut v2 = ModuleStreamV2::default();
    *v2.base_mut() = v1.base().clone();

    let mut deps = Dependencies::new();
    for (module, stream) in v1.buildtime_requirements() {
        deps.add_buildtime_stream(module.as_str(), stream.as_str());
    }
    for (module, stream) in v1.runtime_requirements() {
        deps.add_runtime_stream(module.as_str(), stream.as_str());
    }
    if !deps.is_empty() {
        v2.add_dependencies(deps);
    }
    v2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_maps_requirements() {
        let mut v1 = ModuleStreamV1::new(Some("SuperModule"), Some("latest"));
        v1.add_buildtime_requirement("ModuleA", "streamZ");
        v1.add_buildtime_requirement("ModuleB", "streamY");
        v1.add_runtime_requirement("ModuleA", "streamZ");
        v1.add_runtime_requirement("ModuleB", "streamY");
        v1.add_content_license("GPLv2");

        let upgraded = upgrade(&v1.into(), 2).unwrap();
        let v2 = upgraded.as_v2().unwrap();
        assert_eq!(v2.dependencies().len(), 1);
        let deps = &v2.dependencies()[0];
        assert_eq!(deps.buildtime_modules(), vec!["ModuleA", "ModuleB"]);
        assert!(deps.buildtime_streams("ModuleA").unwrap().contains("streamZ"));
        assert!(deps.requires_module_and_stream("ModuleB", "streamY"));
        assert!(v2.content_licenses().contains("GPLv2"));
    }

    #[test]
    fn test_upgrade_without_requirements_adds_no_dependencies() {
        let v1 = ModuleStreamV1::new(Some("foo"), Some("bar"));
        let upgraded = upgrade(&v1.into(), 2).unwrap();
        assert!(upgraded.as_v2().unwrap().dependencies().is_empty());
    }

    #[test]
    fn test_upgrade_errors() {
        let v1: ModuleStream = ModuleStreamV1::new(Some("foo"), Some("bar")).into();
        assert_eq!(upgrade(&v1, 3), Err(UpgradeError::UnknownVersion(3)));
        assert_eq!(upgrade(&v1, 0), Err(UpgradeError::UnknownVersion(0)));

        let v2: ModuleStream = ModuleStreamV2::new(Some("foo"), Some("bar")).into();
        assert_eq!(upgrade(&v2, 1), Err(UpgradeError::Downgrade { from: 2, to: 1 }));
        assert_eq!(upgrade(&v2, 2).unwrap(), v2);
    }
}
