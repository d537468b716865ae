//! Module stream export

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::ExportError;
use crate::models::component::{ModuleComponent, RpmComponent};
use crate::models::dependencies::Dependencies;
use crate::models::stream::{MdVersion, ModuleStream, ModuleStreamV1, ModuleStreamV2, StreamCommon};
use crate::yaml::{Mapping, Node, emit_document};

pub(crate) fn block_list<'a>(items: impl IntoIterator<Item = &'a String>) -> Node {
    Node::sequence(items.into_iter().map(|s| Node::plain(s.as_str())).collect())
}

pub(crate) fn flow_list<'a>(items: impl IntoIterator<Item = &'a String>) -> Node {
    Node::flow_sequence(items.into_iter().map(|s| Node::plain(s.as_str())).collect())
}

fn insert_text(mapping: &mut Mapping, key: &str, value: Option<&str>) {
    if let Some(text) = value {
        mapping.insert(key, Node::plain(text));
    }
}

fn insert_block_list(mapping: &mut Mapping, key: &str, items: &BTreeSet<String>) {
    if !items.is_empty() {
        mapping.insert(key, block_list(items));
    }
}

fn rpm_list(items: &BTreeSet<String>) -> Mapping {
    let mut mapping = Mapping::new();
    mapping.insert("rpms", block_list(items));
    mapping
}

/// Writer of `modulemd` documents
#[derive(Debug, Clone, Default)]
pub struct StreamExporter;

impl StreamExporter {
    pub fn new() -> Self {
        Self
    }

    /// Emit a stream as a single YAML document.
    pub fn export(&self, stream: &ModuleStream) -> Result<String, ExportError> {
        let node = self.to_node(stream)?;
        Ok(emit_document(&node)?)
    }

    /// Build the complete document, envelope included.
    pub fn to_node(&self, stream: &ModuleStream) -> Result<Node, ExportError> {
        if stream.summary().is_none() {
            return Err(ExportError::MissingField("summary"));
        }
        if stream.description().is_none() {
            return Err(ExportError::MissingField("description"));
        }
        if stream.module_licenses().is_empty() {
            return Err(ExportError::MissingField("license.module"));
        }

        let data = match stream {
            ModuleStream::V1(v1) => self.data_v1(v1),
            ModuleStream::V2(v2) => self.data_v2(v2),
        };
        debug!(
            "Exporting module stream {} as version {}",
            stream.nsvca_string().unwrap_or_default(),
            stream.mdversion()
        );

        let mut document = Mapping::new();
        document.insert("document", Node::plain("modulemd"));
        document.insert("version", Node::uint(stream.mdversion().as_u64()));
        document.insert("data", data);
        Ok(document.into())
    }

    fn data_v1(&self, stream: &ModuleStreamV1) -> Mapping {
        let mut data = self.header(stream);

        let mut deps = Mapping::new();
        let string_map = |map: &BTreeMap<String, String>| -> Mapping {
            map.iter()
                .map(|(module, name)| (module.as_str(), Node::plain(name.as_str())))
                .collect()
        };
        if !stream.buildtime_requirements().is_empty() {
            deps.insert("buildrequires", string_map(stream.buildtime_requirements()));
        }
        if !stream.runtime_requirements().is_empty() {
            deps.insert("requires", string_map(stream.runtime_requirements()));
        }
        if !deps.is_empty() {
            data.insert("dependencies", deps);
        }

        self.body(stream, MdVersion::V1, &mut data);
        if !stream.rpm_artifacts().is_empty() {
            data.insert("artifacts", rpm_list(stream.rpm_artifacts()));
        }
        data
    }

    fn data_v2(&self, stream: &ModuleStreamV2) -> Mapping {
        let mut data = self.header(stream);

        if !stream.dependencies().is_empty() {
            let list: Vec<Node> = stream
                .dependencies()
                .iter()
                .map(|d| Node::from(Self::dependencies(d)))
                .collect();
            data.insert("dependencies", Node::sequence(list));
        }

        self.body(stream, MdVersion::V2, &mut data);

        let mut artifacts = Mapping::new();
        insert_block_list(&mut artifacts, "rpms", stream.rpm_artifacts());
        if !stream.rpm_artifact_map().is_empty() {
            let mut digests = Mapping::new();
            for (digest, entries) in stream.rpm_artifact_map() {
                let mut checksums = Mapping::new();
                for (checksum, entry) in entries {
                    let mut body = Mapping::new();
                    body.insert("name", Node::plain(entry.name.as_str()));
                    body.insert("epoch", Node::uint(entry.epoch));
                    body.insert("version", Node::plain(entry.version.as_str()));
                    body.insert("release", Node::plain(entry.release.as_str()));
                    body.insert("arch", Node::plain(entry.arch.as_str()));
                    body.insert("nevra", Node::plain(entry.nevra()));
                    checksums.insert(checksum.as_str(), body);
                }
                digests.insert(digest.as_str(), checksums);
            }
            artifacts.insert("rpm-map", digests);
        }
        if !artifacts.is_empty() {
            data.insert("artifacts", artifacts);
        }
        data
    }

    /// Identity, descriptive text, service levels, licenses and xmd.
    fn header<S: StreamCommon>(&self, stream: &S) -> Mapping {
        let mut data = Mapping::new();
        insert_text(&mut data, "name", stream.module_name());
        insert_text(&mut data, "stream", stream.stream_name());
        if stream.version() != 0 {
            data.insert("version", Node::uint(stream.version()));
        }
        insert_text(&mut data, "context", stream.context());
        insert_text(&mut data, "arch", stream.arch());
        insert_text(&mut data, "summary", stream.summary());
        if let Some(description) = stream.description() {
            data.insert("description", Node::folded(description));
        }

        if !stream.servicelevels().is_empty() {
            let mut levels = Mapping::new();
            for (name, level) in stream.servicelevels() {
                let mut body = Mapping::new();
                if let Some(eol) = level.eol_string() {
                    body.insert("eol", Node::plain(eol));
                }
                levels.insert(name.as_str(), body);
            }
            data.insert("servicelevels", levels);
        }

        let mut license = Mapping::new();
        insert_block_list(&mut license, "module", stream.module_licenses());
        insert_block_list(&mut license, "content", stream.content_licenses());
        data.insert("license", license);

        if let Some(xmd) = stream.xmd() {
            data.insert("xmd", xmd.clone());
        }
        data
    }

    /// Everything between dependencies and artifacts.
    fn body<S: StreamCommon>(&self, stream: &S, version: MdVersion, data: &mut Mapping) {
        let mut references = Mapping::new();
        insert_text(&mut references, "community", stream.community());
        insert_text(&mut references, "documentation", stream.documentation());
        insert_text(&mut references, "tracker", stream.tracker());
        if !references.is_empty() {
            data.insert("references", references);
        }

        if !stream.profiles().is_empty() {
            let mut profiles = Mapping::new();
            for (name, profile) in stream.profiles() {
                let mut body = Mapping::new();
                insert_text(&mut body, "description", profile.description.as_deref());
                insert_block_list(&mut body, "rpms", &profile.rpms);
                profiles.insert(name.as_str(), body);
            }
            data.insert("profiles", profiles);
        }

        if !stream.rpm_api().is_empty() {
            data.insert("api", rpm_list(stream.rpm_api()));
        }
        if !stream.rpm_filters().is_empty() {
            data.insert("filter", rpm_list(stream.rpm_filters()));
        }

        let buildopts = stream.buildopts();
        let mut opts = Mapping::new();
        let mut rpms = Mapping::new();
        if let Some(macros) = &buildopts.rpm_macros {
            rpms.insert("macros", Node::folded(macros.as_str()));
        }
        if version == MdVersion::V2 {
            insert_block_list(&mut rpms, "whitelist", &buildopts.rpm_whitelist);
        }
        if !rpms.is_empty() {
            opts.insert("rpms", rpms);
        }
        if version == MdVersion::V2 && !buildopts.arches.is_empty() {
            opts.insert("arches", flow_list(&buildopts.arches));
        }
        if !opts.is_empty() {
            data.insert("buildopts", opts);
        }

        let mut components = Mapping::new();
        if !stream.rpm_components().is_empty() {
            let rpms: Mapping = stream
                .rpm_components()
                .iter()
                .map(|(name, c)| (name.as_str(), Self::rpm_component(c, version)))
                .collect();
            components.insert("rpms", rpms);
        }
        if !stream.module_components().is_empty() {
            let modules: Mapping = stream
                .module_components()
                .iter()
                .map(|(name, c)| (name.as_str(), Self::module_component(c, version)))
                .collect();
            components.insert("modules", modules);
        }
        if !components.is_empty() {
            data.insert("components", components);
        }
    }

    fn dependencies(deps: &Dependencies) -> Mapping {
        let streams = |map: &BTreeMap<String, BTreeSet<String>>| -> Mapping {
            map.iter()
                .map(|(module, streams)| (module.as_str(), flow_list(streams)))
                .collect()
        };
        let mut body = Mapping::new();
        if !deps.buildtime().is_empty() {
            body.insert("buildrequires", streams(deps.buildtime()));
        }
        if !deps.runtime().is_empty() {
            body.insert("requires", streams(deps.runtime()));
        }
        body
    }

    fn build_order(
        body: &mut Mapping,
        buildorder: i64,
        buildafter: &BTreeSet<String>,
        version: MdVersion,
    ) {
        if buildorder != 0 {
            body.insert("buildorder", Node::int(buildorder));
        }
        if version == MdVersion::V2 {
            insert_block_list(body, "buildafter", buildafter);
        }
    }

    fn rpm_component(component: &RpmComponent, version: MdVersion) -> Mapping {
        let mut body = Mapping::new();
        insert_text(&mut body, "rationale", component.rationale.as_deref());
        if version == MdVersion::V2 {
            insert_text(&mut body, "name", component.package_name.as_deref());
        }
        insert_text(&mut body, "repository", component.repository.as_deref());
        insert_text(&mut body, "cache", component.cache.as_deref());
        insert_text(&mut body, "ref", component.reference.as_deref());
        if !component.arches.is_empty() {
            body.insert("arches", flow_list(&component.arches));
        }
        if !component.multilib.is_empty() {
            body.insert("multilib", flow_list(&component.multilib));
        }
        Self::build_order(&mut body, component.buildorder, &component.buildafter, version);
        body
    }

    fn module_component(component: &ModuleComponent, version: MdVersion) -> Mapping {
        let mut body = Mapping::new();
        insert_text(&mut body, "rationale", component.rationale.as_deref());
        insert_text(&mut body, "repository", component.repository.as_deref());
        insert_text(&mut body, "ref", component.reference.as_deref());
        Self::build_order(&mut body, component.buildorder, &component.buildafter, version);
        body
    }
}
