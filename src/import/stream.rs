//! Module stream import
//!
//! Reads the `data` mapping of a `modulemd` document of version 1 or 2 into a
//! [`ModuleStream`]. Keys are matched against the schema of the document's
//! version; a key of the other version is unknown.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::config::ParseConfig;
use super::fields::{
    expect_mapping, expect_sequence, read_date, read_i64, read_optional_string, read_rpm_list,
    read_string, read_string_map, read_string_set, read_string_set_map, read_text, read_u64,
    unknown_key,
};
use crate::models::buildopts::Buildopts;
use crate::models::component::{ModuleComponent, RpmComponent};
use crate::models::dependencies::Dependencies;
use crate::models::profile::Profile;
use crate::models::rpm_map::RpmMapEntry;
use crate::models::service_level::ServiceLevel;
use crate::models::stream::{
    MdVersion, ModuleStream, ModuleStreamV1, ModuleStreamV2, StreamBase, StreamCommon,
};
use crate::validation::{self, ValidationError};
use crate::yaml::Node;

/// Version 1 dependency maps
#[derive(Default)]
struct RequirementsV1 {
    buildtime: BTreeMap<String, String>,
    runtime: BTreeMap<String, String>,
}

/// Parser for the payload of a module stream document
pub struct StreamParser<'a> {
    version: MdVersion,
    config: &'a ParseConfig,
}

impl<'a> StreamParser<'a> {
    pub fn new(version: MdVersion, config: &'a ParseConfig) -> Self {
        Self { version, config }
    }

    fn is_v2(&self) -> bool {
        self.version == MdVersion::V2
    }

    /// Parse `data` and, when configured, validate the result.
    pub fn parse(&self, data: &Node) -> Result<ModuleStream, ValidationError> {
        let mut base = StreamBase::default();
        let mut eol: Option<NaiveDate> = None;
        let mut requirements_v1 = RequirementsV1::default();
        let mut dependencies_v2 = Vec::new();
        let mut rpm_map = Vec::new();

        for (key, value) in expect_mapping(data, "data")?.iter() {
            match key {
                "name" => base.module_name = read_optional_string(value, "name")?,
                "stream" => base.stream_name = read_optional_string(value, "stream")?,
                "version" => base.version = read_u64(value, "version")?,
                "context" => base.context = read_optional_string(value, "context")?,
                "arch" => base.arch = read_optional_string(value, "arch")?,
                "summary" => base.summary = read_text(value, "summary")?,
                "description" => base.description = read_text(value, "description")?,
                "eol" if !self.is_v2() => eol = Some(read_date(value, "eol")?),
                "servicelevels" => base.service_levels = self.read_servicelevels(value)?,
                "license" => self.read_license(value, &mut base)?,
                "xmd" => base.xmd = Some(value.clone()).filter(|node| !node.is_null()),
                "dependencies" if self.is_v2() => dependencies_v2 = self.read_dependencies_v2(value)?,
                "dependencies" => requirements_v1 = self.read_requirements_v1(value)?,
                "references" => self.read_references(value, &mut base)?,
                "profiles" => base.profiles = self.read_profiles(value)?,
                "api" => base.rpm_api = read_rpm_list(value, "api", self.config)?,
                "filter" => base.rpm_filters = read_rpm_list(value, "filter", self.config)?,
                "buildopts" => base.buildopts = self.read_buildopts(value)?,
                "components" => self.read_components(value, &mut base)?,
                "artifacts" => self.read_artifacts(value, &mut base, &mut rpm_map)?,
                other => unknown_key("data", other, self.config)?,
            }
        }

        if let Some(date) = eol {
            base.service_levels
                .entry("rawhide".to_string())
                .or_insert_with(|| ServiceLevel::new("rawhide").with_eol(date));
        }

        let mut stream = match self.version {
            MdVersion::V1 => {
                let mut stream = ModuleStreamV1::default();
                stream.base = base;
                for (module, name) in requirements_v1.buildtime {
                    stream.add_buildtime_requirement(module, name);
                }
                for (module, name) in requirements_v1.runtime {
                    stream.add_runtime_requirement(module, name);
                }
                ModuleStream::V1(stream)
            }
            MdVersion::V2 => {
                let mut stream = ModuleStreamV2::default();
                stream.base = base;
                for deps in dependencies_v2 {
                    stream.add_dependencies(deps);
                }
                for (digest, checksum, entry) in rpm_map {
                    stream.set_rpm_artifact_map_entry(entry, digest, checksum);
                }
                ModuleStream::V2(stream)
            }
        };

        if stream.module_name().is_none() {
            stream.set_module_name(self.config.module_name.as_deref());
        }
        if stream.stream_name().is_none() {
            stream.set_stream_name(self.config.stream_name.as_deref());
        }

        if self.config.validate {
            validation::validate_stream(&stream)?;
        }
        debug!(
            "Parsed module stream {} (version {})",
            stream.nsvca_string().unwrap_or_default(),
            self.version
        );
        Ok(stream)
    }

    fn read_servicelevels(
        &self,
        node: &Node,
    ) -> Result<BTreeMap<String, ServiceLevel>, ValidationError> {
        let mut levels = BTreeMap::new();
        for (name, body) in expect_mapping(node, "servicelevels")?.iter() {
            let field = format!("servicelevels.{name}");
            let mut level = ServiceLevel::new(name);
            if !body.is_null() {
                for (key, value) in expect_mapping(body, &field)?.iter() {
                    match key {
                        "eol" => level.eol = Some(read_date(value, &format!("{field}.eol"))?),
                        other => unknown_key(&field, other, self.config)?,
                    }
                }
            }
            levels.insert(name.to_string(), level);
        }
        Ok(levels)
    }

    fn read_license(&self, node: &Node, base: &mut StreamBase) -> Result<(), ValidationError> {
        for (key, value) in expect_mapping(node, "license")?.iter() {
            match key {
                "module" => base.module_licenses = read_string_set(value, "license.module")?,
                "content" => base.content_licenses = read_string_set(value, "license.content")?,
                other => unknown_key("license", other, self.config)?,
            }
        }
        Ok(())
    }

    fn read_references(&self, node: &Node, base: &mut StreamBase) -> Result<(), ValidationError> {
        for (key, value) in expect_mapping(node, "references")?.iter() {
            let field = format!("references.{key}");
            match key {
                "community" => base.community = read_optional_string(value, &field)?,
                "documentation" => base.documentation = read_optional_string(value, &field)?,
                "tracker" => base.tracker = read_optional_string(value, &field)?,
                other => unknown_key("references", other, self.config)?,
            }
        }
        Ok(())
    }

    fn read_requirements_v1(&self, node: &Node) -> Result<RequirementsV1, ValidationError> {
        let mut requirements = RequirementsV1::default();
        for (key, value) in expect_mapping(node, "dependencies")?.iter() {
            match key {
                "buildrequires" => {
                    requirements.buildtime = read_string_map(value, "dependencies.buildrequires")?
                }
                "requires" => requirements.runtime = read_string_map(value, "dependencies.requires")?,
                other => unknown_key("dependencies", other, self.config)?,
            }
        }
        Ok(requirements)
    }

    fn read_dependencies_v2(&self, node: &Node) -> Result<Vec<Dependencies>, ValidationError> {
        let mut list = Vec::new();
        for (i, item) in expect_sequence(node, "dependencies")?.iter().enumerate() {
            let field = format!("dependencies[{i}]");
            let mut deps = Dependencies::new();
            for (key, value) in expect_mapping(item, &field)?.iter() {
                let path = format!("{field}.{key}");
                match key {
                    "buildrequires" => {
                        for (module, streams) in read_string_set_map(value, &path)? {
                            deps.set_empty_buildtime_dependencies_for_module(module.clone());
                            for stream in streams {
                                deps.add_buildtime_stream(module.clone(), stream);
                            }
                        }
                    }
                    "requires" => {
                        for (module, streams) in read_string_set_map(value, &path)? {
                            deps.set_empty_runtime_dependencies_for_module(module.clone());
                            for stream in streams {
                                deps.add_runtime_stream(module.clone(), stream);
                            }
                        }
                    }
                    other => unknown_key(&field, other, self.config)?,
                }
            }
            list.push(deps);
        }
        Ok(list)
    }

    fn read_profiles(&self, node: &Node) -> Result<BTreeMap<String, Profile>, ValidationError> {
        let mut profiles = BTreeMap::new();
        for (name, body) in expect_mapping(node, "profiles")?.iter() {
            let field = format!("profiles.{name}");
            let mut profile = Profile::new(name);
            if !body.is_null() {
                for (key, value) in expect_mapping(body, &field)?.iter() {
                    let path = format!("{field}.{key}");
                    match key {
                        "description" => profile.description = read_text(value, &path)?,
                        "rpms" => profile.rpms = read_string_set(value, &path)?,
                        other => unknown_key(&field, other, self.config)?,
                    }
                }
            }
            profiles.insert(name.to_string(), profile);
        }
        Ok(profiles)
    }

    fn read_buildopts(&self, node: &Node) -> Result<Buildopts, ValidationError> {
        let mut buildopts = Buildopts::new();
        for (key, value) in expect_mapping(node, "buildopts")?.iter() {
            match key {
                "rpms" => {
                    for (rpm_key, rpm_value) in expect_mapping(value, "buildopts.rpms")?.iter() {
                        let path = format!("buildopts.rpms.{rpm_key}");
                        match rpm_key {
                            "macros" => buildopts.rpm_macros = read_optional_string(rpm_value, &path)?,
                            "whitelist" if self.is_v2() => {
                                buildopts.rpm_whitelist = read_string_set(rpm_value, &path)?
                            }
                            other => unknown_key("buildopts.rpms", other, self.config)?,
                        }
                    }
                }
                "arches" if self.is_v2() => {
                    buildopts.arches = read_string_set(value, "buildopts.arches")?
                }
                other => unknown_key("buildopts", other, self.config)?,
            }
        }
        Ok(buildopts)
    }

    fn read_components(&self, node: &Node, base: &mut StreamBase) -> Result<(), ValidationError> {
        for (key, value) in expect_mapping(node, "components")?.iter() {
            match key {
                "rpms" => {
                    for (name, body) in expect_mapping(value, "components.rpms")?.iter() {
                        let component = self.read_rpm_component(name, body)?;
                        base.rpm_components.insert(name.to_string(), component);
                    }
                }
                "modules" => {
                    for (name, body) in expect_mapping(value, "components.modules")?.iter() {
                        let component = self.read_module_component(name, body)?;
                        base.module_components.insert(name.to_string(), component);
                    }
                }
                other => unknown_key("components", other, self.config)?,
            }
        }
        Ok(())
    }

    fn read_rpm_component(&self, name: &str, node: &Node) -> Result<RpmComponent, ValidationError> {
        let field = format!("components.rpms.{name}");
        let mut component = RpmComponent::new(name);
        for (key, value) in expect_mapping(node, &field)?.iter() {
            let path = format!("{field}.{key}");
            match key {
                "rationale" => component.rationale = read_text(value, &path)?,
                "name" if self.is_v2() => component.package_name = read_optional_string(value, &path)?,
                "repository" => component.repository = read_optional_string(value, &path)?,
                "cache" => component.cache = read_optional_string(value, &path)?,
                "ref" => component.reference = read_optional_string(value, &path)?,
                "buildorder" => component.buildorder = read_i64(value, &path)?,
                "buildafter" if self.is_v2() => component.buildafter = read_string_set(value, &path)?,
                "arches" => component.arches = read_string_set(value, &path)?,
                "multilib" => component.multilib = read_string_set(value, &path)?,
                other => unknown_key(&field, other, self.config)?,
            }
        }
        Ok(component)
    }

    fn read_module_component(
        &self,
        name: &str,
        node: &Node,
    ) -> Result<ModuleComponent, ValidationError> {
        let field = format!("components.modules.{name}");
        let mut component = ModuleComponent::new(name);
        for (key, value) in expect_mapping(node, &field)?.iter() {
            let path = format!("{field}.{key}");
            match key {
                "rationale" => component.rationale = read_text(value, &path)?,
                "repository" => component.repository = read_optional_string(value, &path)?,
                "ref" => component.reference = read_optional_string(value, &path)?,
                "buildorder" => component.buildorder = read_i64(value, &path)?,
                "buildafter" if self.is_v2() => component.buildafter = read_string_set(value, &path)?,
                other => unknown_key(&field, other, self.config)?,
            }
        }
        Ok(component)
    }

    fn read_artifacts(
        &self,
        node: &Node,
        base: &mut StreamBase,
        rpm_map: &mut Vec<(String, String, RpmMapEntry)>,
    ) -> Result<(), ValidationError> {
        for (key, value) in expect_mapping(node, "artifacts")?.iter() {
            match key {
                "rpms" => base.rpm_artifacts = read_string_set(value, "artifacts.rpms")?,
                "rpm-map" if self.is_v2() => {
                    for (digest, checksums) in expect_mapping(value, "artifacts.rpm-map")?.iter() {
                        let field = format!("artifacts.rpm-map.{digest}");
                        for (checksum, body) in expect_mapping(checksums, &field)?.iter() {
                            let entry = self.read_rpm_map_entry(body, &format!("{field}.{checksum}"))?;
                            rpm_map.push((digest.to_string(), checksum.to_string(), entry));
                        }
                    }
                }
                other => unknown_key("artifacts", other, self.config)?,
            }
        }
        Ok(())
    }

    fn read_rpm_map_entry(&self, node: &Node, field: &str) -> Result<RpmMapEntry, ValidationError> {
        let mut name = None;
        let mut epoch = None;
        let mut version = None;
        let mut release = None;
        let mut arch = None;
        let mut nevra = None;

        for (key, value) in expect_mapping(node, field)?.iter() {
            let path = format!("{field}.{key}");
            match key {
                "name" => name = Some(read_string(value, &path)?),
                "epoch" => epoch = Some(read_u64(value, &path)?),
                "version" => version = Some(read_string(value, &path)?),
                "release" => release = Some(read_string(value, &path)?),
                "arch" => arch = Some(read_string(value, &path)?),
                "nevra" => nevra = Some(read_string(value, &path)?),
                other => unknown_key(field, other, self.config)?,
            }
        }

        let missing = |key: &str| ValidationError::MissingField(format!("{field}.{key}"));
        let entry = RpmMapEntry::new(
            name.ok_or_else(|| missing("name"))?,
            epoch.ok_or_else(|| missing("epoch"))?,
            version.ok_or_else(|| missing("version"))?,
            release.ok_or_else(|| missing("release"))?,
            arch.ok_or_else(|| missing("arch"))?,
        );

        if let Some(declared) = nevra {
            let derived = entry.nevra();
            if declared != derived {
                return Err(ValidationError::NevraMismatch {
                    checksum: field.to_string(),
                    declared,
                    derived,
                });
            }
        }
        Ok(entry)
    }
}
