//! Module stream models
//!
//! A stream is one variant of a module. Both metadata versions share the
//! identity, descriptive and collection fields held in [`StreamBase`] and the
//! accessors of [`StreamCommon`]; the version-specific dependency layouts live
//! in [`ModuleStreamV1`] and [`ModuleStreamV2`]. [`ModuleStream`] is the tagged
//! union the parsers produce and the index stores.

pub mod v1;
pub mod v2;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::convert::{self, UpgradeError};
use crate::export::{ExportError, StreamExporter};
use crate::import::{ImportError, ModulemdImporter, ParseConfig};
use crate::models::buildopts::Buildopts;
use crate::models::component::{Component, ModuleComponent, RpmComponent};
use crate::models::free_text;
use crate::models::profile::Profile;
use crate::models::service_level::ServiceLevel;
use crate::validation::{self, ValidationError};
use crate::yaml::{ConversionError, Node, from_node, to_node};

pub use v1::ModuleStreamV1;
pub use v2::{ModuleStreamV2, RpmMap};

/// Metadata format version of a stream document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MdVersion {
    V1 = 1,
    V2 = 2,
}

impl MdVersion {
    pub const LATEST: MdVersion = MdVersion::V2;

    pub fn from_u64(version: u64) -> Option<Self> {
        match version {
            1 => Some(MdVersion::V1),
            2 => Some(MdVersion::V2),
            _ => None,
        }
    }

    pub fn as_u64(self) -> u64 {
        self as u64
    }
}

impl fmt::Display for MdVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

/// Fields common to every metadata version
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamBase {
    pub(crate) module_name: Option<String>,
    pub(crate) stream_name: Option<String>,
    pub(crate) version: u64,
    pub(crate) context: Option<String>,
    pub(crate) arch: Option<String>,
    pub(crate) summary: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) community: Option<String>,
    pub(crate) documentation: Option<String>,
    pub(crate) tracker: Option<String>,
    pub(crate) module_licenses: BTreeSet<String>,
    pub(crate) content_licenses: BTreeSet<String>,
    pub(crate) rpm_api: BTreeSet<String>,
    pub(crate) rpm_filters: BTreeSet<String>,
    pub(crate) rpm_artifacts: BTreeSet<String>,
    pub(crate) profiles: BTreeMap<String, Profile>,
    pub(crate) service_levels: BTreeMap<String, ServiceLevel>,
    pub(crate) rpm_components: BTreeMap<String, RpmComponent>,
    pub(crate) module_components: BTreeMap<String, ModuleComponent>,
    pub(crate) buildopts: Buildopts,
    pub(crate) xmd: Option<Node>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Accessors shared by every stream version
///
/// Setters taking `Option<&str>` clear the field when given `None` or an
/// empty string.
pub trait StreamCommon {
    fn base(&self) -> &StreamBase;
    fn base_mut(&mut self) -> &mut StreamBase;
    fn mdversion(&self) -> MdVersion;

    /// Whether any run-time requirement names exactly this module stream.
    fn depends_on_stream(&self, module: &str, stream: &str) -> bool;

    /// Whether any build-time requirement names exactly this module stream.
    fn build_depends_on_stream(&self, module: &str, stream: &str) -> bool;

    fn module_name(&self) -> Option<&str> {
        self.base().module_name.as_deref()
    }

    fn set_module_name(&mut self, name: Option<&str>) {
        self.base_mut().module_name = non_empty(name);
    }

    fn stream_name(&self) -> Option<&str> {
        self.base().stream_name.as_deref()
    }

    fn set_stream_name(&mut self, name: Option<&str>) {
        self.base_mut().stream_name = non_empty(name);
    }

    fn version(&self) -> u64 {
        self.base().version
    }

    fn set_version(&mut self, version: u64) {
        self.base_mut().version = version;
    }

    fn context(&self) -> Option<&str> {
        self.base().context.as_deref()
    }

    fn set_context(&mut self, context: Option<&str>) {
        self.base_mut().context = non_empty(context);
    }

    fn arch(&self) -> Option<&str> {
        self.base().arch.as_deref()
    }

    fn set_arch(&mut self, arch: Option<&str>) {
        self.base_mut().arch = non_empty(arch);
    }

    fn summary(&self) -> Option<&str> {
        self.base().summary.as_deref()
    }

    fn set_summary(&mut self, summary: Option<&str>) {
        self.base_mut().summary = free_text(summary);
    }

    fn description(&self) -> Option<&str> {
        self.base().description.as_deref()
    }

    fn set_description(&mut self, description: Option<&str>) {
        self.base_mut().description = free_text(description);
    }

    fn community(&self) -> Option<&str> {
        self.base().community.as_deref()
    }

    fn set_community(&mut self, community: Option<&str>) {
        self.base_mut().community = non_empty(community);
    }

    fn documentation(&self) -> Option<&str> {
        self.base().documentation.as_deref()
    }

    fn set_documentation(&mut self, documentation: Option<&str>) {
        self.base_mut().documentation = non_empty(documentation);
    }

    fn tracker(&self) -> Option<&str> {
        self.base().tracker.as_deref()
    }

    fn set_tracker(&mut self, tracker: Option<&str>) {
        self.base_mut().tracker = non_empty(tracker);
    }

    fn module_licenses(&self) -> &BTreeSet<String> {
        &self.base().module_licenses
    }

    fn add_module_license(&mut self, license: &str) {
        self.base_mut().module_licenses.insert(license.to_string());
    }

    fn remove_module_license(&mut self, license: &str) {
        self.base_mut().module_licenses.remove(license);
    }

    fn clear_module_licenses(&mut self) {
        self.base_mut().module_licenses.clear();
    }

    fn content_licenses(&self) -> &BTreeSet<String> {
        &self.base().content_licenses
    }

    fn add_content_license(&mut self, license: &str) {
        self.base_mut().content_licenses.insert(license.to_string());
    }

    fn remove_content_license(&mut self, license: &str) {
        self.base_mut().content_licenses.remove(license);
    }

    fn clear_content_licenses(&mut self) {
        self.base_mut().content_licenses.clear();
    }

    fn rpm_api(&self) -> &BTreeSet<String> {
        &self.base().rpm_api
    }

    fn add_rpm_api(&mut self, rpm: &str) {
        self.base_mut().rpm_api.insert(rpm.to_string());
    }

    fn remove_rpm_api(&mut self, rpm: &str) {
        self.base_mut().rpm_api.remove(rpm);
    }

    fn clear_rpm_api(&mut self) {
        self.base_mut().rpm_api.clear();
    }

    fn rpm_filters(&self) -> &BTreeSet<String> {
        &self.base().rpm_filters
    }

    fn add_rpm_filter(&mut self, rpm: &str) {
        self.base_mut().rpm_filters.insert(rpm.to_string());
    }

    fn remove_rpm_filter(&mut self, rpm: &str) {
        self.base_mut().rpm_filters.remove(rpm);
    }

    fn clear_rpm_filters(&mut self) {
        self.base_mut().rpm_filters.clear();
    }

    fn rpm_artifacts(&self) -> &BTreeSet<String> {
        &self.base().rpm_artifacts
    }

    fn add_rpm_artifact(&mut self, nevra: &str) {
        self.base_mut().rpm_artifacts.insert(nevra.to_string());
    }

    fn remove_rpm_artifact(&mut self, nevra: &str) {
        self.base_mut().rpm_artifacts.remove(nevra);
    }

    fn clear_rpm_artifacts(&mut self) {
        self.base_mut().rpm_artifacts.clear();
    }

    fn profiles(&self) -> &BTreeMap<String, Profile> {
        &self.base().profiles
    }

    fn profile(&self, name: &str) -> Option<&Profile> {
        self.base().profiles.get(name)
    }

    /// Add a profile, replacing any profile of the same name.
    fn add_profile(&mut self, profile: Profile) {
        self.base_mut()
            .profiles
            .insert(profile.name.clone(), profile);
    }

    fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        self.base_mut().profiles.remove(name)
    }

    fn clear_profiles(&mut self) {
        self.base_mut().profiles.clear();
    }

    fn servicelevels(&self) -> &BTreeMap<String, ServiceLevel> {
        &self.base().service_levels
    }

    fn servicelevel(&self, name: &str) -> Option<&ServiceLevel> {
        self.base().service_levels.get(name)
    }

    fn add_servicelevel(&mut self, servicelevel: ServiceLevel) {
        self.base_mut()
            .service_levels
            .insert(servicelevel.name.clone(), servicelevel);
    }

    fn remove_servicelevel(&mut self, name: &str) -> Option<ServiceLevel> {
        self.base_mut().service_levels.remove(name)
    }

    fn clear_servicelevels(&mut self) {
        self.base_mut().service_levels.clear();
    }

    /// Add a component, replacing a component of the same kind and name.
    fn add_component(&mut self, component: impl Into<Component>)
    where
        Self: Sized,
    {
        match component.into() {
            Component::Rpm(rpm) => {
                self.base_mut().rpm_components.insert(rpm.name.clone(), rpm);
            }
            Component::Module(module) => {
                self.base_mut()
                    .module_components
                    .insert(module.name.clone(), module);
            }
        }
    }

    fn rpm_components(&self) -> &BTreeMap<String, RpmComponent> {
        &self.base().rpm_components
    }

    fn rpm_component(&self, name: &str) -> Option<&RpmComponent> {
        self.base().rpm_components.get(name)
    }

    fn remove_rpm_component(&mut self, name: &str) -> Option<RpmComponent> {
        self.base_mut().rpm_components.remove(name)
    }

    fn clear_rpm_components(&mut self) {
        self.base_mut().rpm_components.clear();
    }

    fn module_components(&self) -> &BTreeMap<String, ModuleComponent> {
        &self.base().module_components
    }

    fn module_component(&self, name: &str) -> Option<&ModuleComponent> {
        self.base().module_components.get(name)
    }

    fn remove_module_component(&mut self, name: &str) -> Option<ModuleComponent> {
        self.base_mut().module_components.remove(name)
    }

    fn clear_module_components(&mut self) {
        self.base_mut().module_components.clear();
    }

    fn buildopts(&self) -> &Buildopts {
        &self.base().buildopts
    }

    fn buildopts_mut(&mut self) -> &mut Buildopts {
        &mut self.base_mut().buildopts
    }

    fn set_buildopts(&mut self, buildopts: Buildopts) {
        self.base_mut().buildopts = buildopts;
    }

    fn xmd(&self) -> Option<&Node> {
        self.base().xmd.as_ref()
    }

    fn set_xmd(&mut self, xmd: Option<Node>) {
        self.base_mut().xmd = xmd.filter(|node| !node.is_null());
    }

    /// Store any serializable value as xmd.
    fn set_xmd_from<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ConversionError>
    where
        Self: Sized,
    {
        let node = to_node(value)?;
        self.base_mut().xmd = Some(node);
        Ok(())
    }

    /// Read xmd back as a typed value.
    fn xmd_as<T: DeserializeOwned>(&self) -> Result<Option<T>, ConversionError>
    where
        Self: Sized,
    {
        self.xmd().map(from_node).transpose()
    }

    /// `name:stream:version[:context]`, or `None` unless both name and stream are set
    fn nsvc_string(&self) -> Option<String> {
        let base = self.base();
        let name = base.module_name.as_deref()?;
        let stream = base.stream_name.as_deref()?;
        let mut nsvc = format!("{name}:{stream}:{}", base.version);
        if let Some(context) = &base.context {
            nsvc.push(':');
            nsvc.push_str(context);
        }
        Some(nsvc)
    }

    /// `name:stream:version:context:arch` with absent parts left empty
    ///
    /// A version of 0 counts as absent. Trailing empty segments are dropped,
    /// so a stream with only a name renders as the bare name. `None` when the
    /// module name is unset.
    fn nsvca_string(&self) -> Option<String> {
        let base = self.base();
        let name = base.module_name.as_deref()?;
        let version = match base.version {
            0 => String::new(),
            v => v.to_string(),
        };
        let mut segments = vec![
            name,
            base.stream_name.as_deref().unwrap_or_default(),
            version.as_str(),
            base.context.as_deref().unwrap_or_default(),
            base.arch.as_deref().unwrap_or_default(),
        ];
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
        Some(segments.join(":"))
    }
}

/// A stream of either metadata version
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleStream {
    V1(ModuleStreamV1),
    V2(ModuleStreamV2),
}

impl ModuleStream {
    /// Create an empty stream of the given metadata version.
    pub fn new(
        mdversion: u64,
        module_name: Option<&str>,
        stream_name: Option<&str>,
    ) -> Result<Self, ValidationError> {
        match MdVersion::from_u64(mdversion) {
            Some(MdVersion::V1) => {
                Ok(ModuleStream::V1(ModuleStreamV1::new(module_name, stream_name)))
            }
            Some(MdVersion::V2) => {
                Ok(ModuleStream::V2(ModuleStreamV2::new(module_name, stream_name)))
            }
            None => Err(ValidationError::InvalidValue {
                field: "mdversion".to_string(),
                value: mdversion.to_string(),
                reason: format!("supported versions are 1 to {}", MdVersion::LATEST),
            }),
        }
    }

    /// Parse a single `modulemd` document.
    ///
    /// Identity fields given in `config` fill in a name or stream the document
    /// leaves unset.
    pub fn read_str(yaml: &str, config: &ParseConfig) -> Result<Self, ImportError> {
        ModulemdImporter::with_config(config.clone()).import_stream(yaml)
    }

    /// Emit the stream as a complete YAML document.
    pub fn to_yaml_string(&self) -> Result<String, ExportError> {
        StreamExporter::new().export(self)
    }

    /// Deep copy, optionally renaming the module and/or the stream.
    pub fn copy(&self, module_name: Option<&str>, stream_name: Option<&str>) -> Self {
        let mut copy = self.clone();
        if let Some(name) = module_name.filter(|n| !n.is_empty()) {
            copy.set_module_name(Some(name));
        }
        if let Some(name) = stream_name.filter(|n| !n.is_empty()) {
            copy.set_stream_name(Some(name));
        }
        copy
    }

    /// Check the cross-field invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_stream(self)
    }

    /// Produce an equivalent stream in a newer metadata version.
    pub fn upgrade(&self, target: u64) -> Result<ModuleStream, UpgradeError> {
        convert::upgrade(self, target)
    }

    pub fn as_v1(&self) -> Option<&ModuleStreamV1> {
        match self {
            ModuleStream::V1(stream) => Some(stream),
            ModuleStream::V2(_) => None,
        }
    }

    pub fn as_v1_mut(&mut self) -> Option<&mut ModuleStreamV1> {
        match self {
            ModuleStream::V1(stream) => Some(stream),
            ModuleStream::V2(_) => None,
        }
    }

    pub fn as_v2(&self) -> Option<&ModuleStreamV2> {
        match self {
            ModuleStream::V2(stream) => Some(stream),
            ModuleStream::V1(_) => None,
        }
    }

    pub fn as_v2_mut(&mut self) -> Option<&mut ModuleStreamV2> {
        match self {
            ModuleStream::V2(stream) => Some(stream),
            ModuleStream::V1(_) => None,
        }
    }
}

impl StreamCommon for ModuleStream {
    fn base(&self) -> &StreamBase {
        match self {
            ModuleStream::V1(stream) => stream.base(),
            ModuleStream::V2(stream) => stream.base(),
        }
    }

    fn base_mut(&mut self) -> &mut StreamBase {
        match self {
            ModuleStream::V1(stream) => stream.base_mut(),
            ModuleStream::V2(stream) => stream.base_mut(),
        }
    }

    fn mdversion(&self) -> MdVersion {
        match self {
            ModuleStream::V1(_) => MdVersion::V1,
            ModuleStream::V2(_) => MdVersion::V2,
        }
    }

    fn depends_on_stream(&self, module: &str, stream: &str) -> bool {
        match self {
            ModuleStream::V1(s) => s.depends_on_stream(module, stream),
            ModuleStream::V2(s) => s.depends_on_stream(module, stream),
        }
    }

    fn build_depends_on_stream(&self, module: &str, stream: &str) -> bool {
        match self {
            ModuleStream::V1(s) => s.build_depends_on_stream(module, stream),
            ModuleStream::V2(s) => s.build_depends_on_stream(module, stream),
        }
    }
}

impl From<ModuleStreamV1> for ModuleStream {
    fn from(stream: ModuleStreamV1) -> Self {
        ModuleStream::V1(stream)
    }
}

impl From<ModuleStreamV2> for ModuleStream {
    fn from(stream: ModuleStreamV2) -> Self {
        ModuleStream::V2(stream)
    }
}
