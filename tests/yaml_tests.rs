//! Canonical YAML tests: documents read from disk and written back

use modulemd::import::{ImportError, ModulemdImporter, ParseConfig};
use modulemd::models::{ModuleStream, StreamCommon};
use modulemd::validation::ValidationError;
use modulemd::yaml::{Node, NodeKind, parse, parse_documents};

const SPEC_V1: &str = include_str!("data/spec.v1.yaml");
const SPEC_V2: &str = include_str!("data/spec.v2.yaml");
const SPEC_V1_EXPECTED: &str = include_str!("data/spec.v1.expected.yaml");
const SPEC_V2_EXPECTED: &str = include_str!("data/spec.v2.expected.yaml");

mod parse_dump_tests {
    use super::*;

    #[test]
    fn test_v1_parse_dump() {
        let stream = ModuleStream::read_str(SPEC_V1, &ParseConfig::default()).unwrap();
        assert_eq!(stream.mdversion().as_u64(), 1);
        assert_eq!(stream.to_yaml_string().unwrap(), SPEC_V1_EXPECTED);
    }

    #[test]
    fn test_v2_parse_dump() {
        let stream = ModuleStream::read_str(SPEC_V2, &ParseConfig::default()).unwrap();
        assert_eq!(stream.mdversion().as_u64(), 2);
        assert_eq!(stream.to_yaml_string().unwrap(), SPEC_V2_EXPECTED);
    }

    #[test]
    fn test_canonical_output_is_stable() {
        // Re-reading canonical output yields the same stream and the same text
        let first = ModuleStream::read_str(SPEC_V2, &ParseConfig::default()).unwrap();
        let second = ModuleStream::read_str(SPEC_V2_EXPECTED, &ParseConfig::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.to_yaml_string().unwrap(), SPEC_V2_EXPECTED);
    }

    #[test]
    fn test_v2_fields() {
        let stream = ModuleStream::read_str(SPEC_V2, &ParseConfig::default()).unwrap();
        let v2 = stream.as_v2().unwrap();

        assert_eq!(stream.nsvca_string().as_deref(), Some("foo:latest:20160927144203:c0ffee43:x86_64"));
        assert_eq!(v2.dependencies().len(), 4);
        assert!(v2.dependencies()[3].buildtime_streams("extras").unwrap().is_empty());
        assert_eq!(stream.rpm_component("bar").unwrap().package_name.as_deref(), Some("bar-real"));
        assert_eq!(
            stream.buildopts().rpm_macros.as_deref(),
            Some("%demomacro 1\n%demomacro2 %{demomacro}23\n")
        );

        let entry = v2
            .rpm_artifact_map_entry(
                "sha256",
                "ee47083ed80146eb2c84e9a94d0836393912185dcda62b9d93ee0c2ea5dc795b",
            )
            .unwrap();
        assert_eq!(entry.version, "1.23");
        assert_eq!(entry.nevra(), "bar-0:1.23-1.module_deadbeef.x86_64");
    }

    #[test]
    fn test_v1_eol_becomes_rawhide() {
        let yaml = "document: modulemd\nversion: 1\ndata:\n  summary: s\n  description: d\n  eol: 2033-06-01\n  license:\n    module: [MIT]\n";
        let stream = ModuleStream::read_str(yaml, &ParseConfig::default()).unwrap();
        let rawhide = stream.servicelevel("rawhide").unwrap();
        assert_eq!(rawhide.eol_string().as_deref(), Some("2033-06-01"));
    }

    #[test]
    fn test_eol_is_not_a_v2_key() {
        let yaml = "document: modulemd\nversion: 2\ndata:\n  eol: 2033-06-01\n";
        let err = ModuleStream::read_str(yaml, &ParseConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ImportError::Validation(ValidationError::UnknownKey {
                field: "data".to_string(),
                key: "eol".to_string(),
            })
        );
    }
}

mod strictness_tests {
    use super::*;

    const EXTRA_KEY: &str = "document: modulemd\nversion: 2\ndata:\n  name: foo\n  stream: bar\n  summary: s\n  description: d\n  license:\n    module: [MIT]\n  profiles:\n    default:\n      rpms: [foo]\n      installonly: true\n";

    #[test]
    fn test_strict_rejects_nested_unknown_key() {
        let err = ModuleStream::read_str(EXTRA_KEY, &ParseConfig::strict()).unwrap_err();
        assert_eq!(
            err,
            ImportError::Validation(ValidationError::UnknownKey {
                field: "profiles.default".to_string(),
                key: "installonly".to_string(),
            })
        );
    }

    #[test]
    fn test_permissive_skips_unknown_key() {
        let stream = ModuleStream::read_str(EXTRA_KEY, &ParseConfig::permissive()).unwrap();
        assert!(stream.profile("default").unwrap().rpms.contains("foo"));
    }

    #[test]
    fn test_unknown_envelope_key() {
        let yaml = "document: modulemd\nversion: 2\nextra: 1\ndata:\n  summary: s\n";
        assert!(matches!(
            ModuleStream::read_str(yaml, &ParseConfig::strict()),
            Err(ImportError::Validation(ValidationError::UnknownKey { .. }))
        ));
    }

    #[test]
    fn test_kind_mismatch_names_field() {
        let yaml = "document: modulemd\nversion: 2\ndata:\n  license:\n    module: {MIT: yes}\n";
        let err = ModuleStream::read_str(yaml, &ParseConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ImportError::Validation(ValidationError::UnexpectedKind {
                field: "license.module".to_string(),
                expected: NodeKind::Sequence,
                actual: NodeKind::Mapping,
            })
        );
    }

    #[test]
    fn test_identity_from_config() {
        let yaml = "document: modulemd\nversion: 2\ndata:\n  summary: s\n  description: d\n  license:\n    module: [MIT]\n";
        let config = ParseConfig::builder()
            .module_name("fallback")
            .stream_name("main")
            .build();
        let stream = ModuleStream::read_str(yaml, &config).unwrap();
        assert_eq!(stream.nsvc_string().as_deref(), Some("fallback:main:0"));
    }

    #[test]
    fn test_rpm_map_nevra_mismatch() {
        let yaml = "document: modulemd\nversion: 2\ndata:\n  artifacts:\n    rpm-map:\n      sha256:\n        abc:\n          name: bar\n          epoch: 1\n          version: '2'\n          release: '3'\n          arch: noarch\n          nevra: bar-0:2-3.noarch\n";
        let err = ModuleStream::read_str(yaml, &ParseConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Validation(ValidationError::NevraMismatch { ref derived, .. })
                if derived == "bar-1:2-3.noarch"
        ));
    }
}

mod node_tests {
    use super::*;

    #[test]
    fn test_syntax_error_reports_document_index() {
        let yaml = "---\ndocument: modulemd\nversion: 2\ndata: {}\n...\n---\ndata: [unclosed\n...\n";
        let stream = parse_documents(yaml);
        assert_eq!(stream.documents.len(), 1);
        assert_eq!(stream.error.unwrap().document, 1);
    }

    #[test]
    fn test_importer_keeps_documents_before_syntax_error() {
        let yaml = "---\ndocument: modulemd-defaults\nversion: 1\ndata:\n  module: foo\n...\n---\ndata: [unclosed\n...\n";
        let result = ModulemdImporter::new().import(yaml);
        assert_eq!(result.defaults.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].index, 1);
        assert!(matches!(result.errors[0].error, ImportError::Parse(_)));
    }

    #[test]
    fn test_scalar_equality_ignores_style() {
        let plain = parse("foo").unwrap();
        let quoted = parse("'foo'").unwrap();
        assert_eq!(plain, quoted);
        assert_ne!(parse("42").unwrap(), parse("'42'").unwrap());
        assert_eq!(Node::string("foo"), plain);
    }
}
