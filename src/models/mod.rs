//! Models module
//!
//! The in-memory module metadata: streams of both metadata versions, the
//! value types they own, and the module index that aggregates them.

pub mod buildopts;
pub mod component;
pub mod defaults;
pub mod dependencies;
pub mod index;
pub mod module;
pub mod profile;
pub mod rpm_map;
pub mod service_level;
pub mod stream;

pub use buildopts::Buildopts;
pub use component::{Component, ComponentOrdering, ModuleComponent, RpmComponent};
pub use defaults::Defaults;
pub use dependencies::Dependencies;
pub use index::{IndexError, ModuleIndex};
pub use module::{Module, StreamKey};
pub use profile::Profile;
pub use rpm_map::RpmMapEntry;
pub use service_level::ServiceLevel;
pub use stream::{
    MdVersion, ModuleStream, ModuleStreamV1, ModuleStreamV2, RpmMap, StreamBase, StreamCommon,
};

/// Free text as stored: trailing whitespace is dropped and empty text is unset.
pub(crate) fn free_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim_end)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
