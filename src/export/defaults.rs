//! Module defaults export

use super::ExportError;
use super::stream::flow_list;
use crate::models::defaults::Defaults;
use crate::yaml::{Mapping, Node, emit_document};

/// Writer of `modulemd-defaults` documents
#[derive(Debug, Clone, Default)]
pub struct DefaultsExporter;

impl DefaultsExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, defaults: &Defaults) -> Result<String, ExportError> {
        let node = self.to_node(defaults)?;
        Ok(emit_document(&node)?)
    }

    pub fn to_node(&self, defaults: &Defaults) -> Result<Node, ExportError> {
        if defaults.module_name.is_empty() {
            return Err(ExportError::MissingField("module"));
        }

        let mut data = Mapping::new();
        data.insert("module", Node::plain(defaults.module_name.as_str()));
        if let Some(stream) = &defaults.default_stream {
            data.insert("stream", Node::plain(stream.as_str()));
        }
        if !defaults.profiles.is_empty() {
            let profiles: Mapping = defaults
                .profiles
                .iter()
                .map(|(stream, names)| (stream.as_str(), flow_list(names)))
                .collect();
            data.insert("profiles", profiles);
        }

        let mut document = Mapping::new();
        document.insert("document", Node::plain("modulemd-defaults"));
        document.insert("version", Node::uint(1));
        document.insert("data", data);
        Ok(document.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_defaults() {
        let mut defaults = Defaults::new("httpd");
        defaults.set_default_stream(Some("2.4"));
        defaults.add_default_profile_for_stream("2.4", "default");
        defaults.set_empty_default_profiles_for_stream("2.2");
        let yaml = DefaultsExporter::new().export(&defaults).unwrap();
        assert_eq!(
            yaml,
            "---\ndocument: modulemd-defaults\nversion: 1\ndata:\n  module: httpd\n  stream: 2.4\n  profiles:\n    '2.2': []\n    '2.4': [default]\n...\n"
        );
    }
}
