//! Module stream contract tests

use modulemd::import::ParseConfig;
use modulemd::models::{
    Dependencies, ModuleComponent, ModuleStream, ModuleStreamV1, ModuleStreamV2, Profile,
    RpmComponent, RpmMapEntry, ServiceLevel, StreamCommon,
};
use modulemd::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEPENDSON_V1: &str = include_str!("data/dependson_v1.yaml");
const DEPENDSON_V2: &str = include_str!("data/dependson_v2.yaml");

mod identity_tests {
    use super::*;

    #[test]
    fn test_new_rejects_unknown_mdversion() {
        assert!(matches!(
            ModuleStream::new(0, None, None),
            Err(ValidationError::InvalidValue { .. })
        ));
        assert!(ModuleStream::new(3, Some("foo"), None).is_err());
        assert!(ModuleStream::new(1, None, None).is_ok());
    }

    #[test]
    fn test_nsvc() {
        for mdversion in [1, 2] {
            let stream = ModuleStream::new(mdversion, None, None).unwrap();
            assert_eq!(stream.nsvc_string(), None);

            let stream = ModuleStream::new(mdversion, Some("modulename"), None).unwrap();
            assert_eq!(stream.nsvc_string(), None);

            let mut stream =
                ModuleStream::new(mdversion, Some("modulename"), Some("streamname")).unwrap();
            assert_eq!(stream.nsvc_string().as_deref(), Some("modulename:streamname:0"));

            stream.set_version(42);
            assert_eq!(stream.nsvc_string().as_deref(), Some("modulename:streamname:42"));

            stream.set_context(Some("deadbeef"));
            assert_eq!(
                stream.nsvc_string().as_deref(),
                Some("modulename:streamname:42:deadbeef")
            );
        }
    }

    #[test]
    fn test_nsvca() {
        let mut stream = ModuleStream::new(2, None, None).unwrap();
        assert_eq!(stream.nsvca_string(), None);

        stream.set_module_name(Some("modulename"));
        assert_eq!(stream.nsvca_string().as_deref(), Some("modulename"));

        stream.set_stream_name(Some("streamname"));
        assert_eq!(stream.nsvca_string().as_deref(), Some("modulename:streamname"));

        stream.set_arch(Some("x86_64"));
        assert_eq!(
            stream.nsvca_string().as_deref(),
            Some("modulename:streamname:::x86_64")
        );

        stream.set_version(42);
        stream.set_context(Some("deadbeef"));
        assert_eq!(
            stream.nsvca_string().as_deref(),
            Some("modulename:streamname:42:deadbeef:x86_64")
        );

        stream.set_stream_name(None);
        stream.set_arch(None);
        assert_eq!(stream.nsvca_string().as_deref(), Some("modulename::42:deadbeef"));
    }

    #[test]
    fn test_empty_text_clears_field() {
        let mut stream = ModuleStream::new(2, Some("foo"), Some("bar")).unwrap();
        stream.set_description(Some("Something"));
        assert_eq!(stream.description(), Some("Something"));
        stream.set_description(Some(""));
        assert_eq!(stream.description(), None);
        stream.set_documentation(Some("https://docs.example.com"));
        stream.set_documentation(None);
        assert_eq!(stream.documentation(), None);
    }
}

mod equality_tests {
    use super::*;

    fn populated() -> ModuleStreamV2 {
        let mut stream = ModuleStreamV2::new(Some("foo"), Some("bar"));
        stream.set_summary(Some("summary"));
        stream.add_module_license("MIT");
        stream.add_rpm_api("foo");
        let mut profile = Profile::new("default");
        profile.add_rpm("foo");
        stream.add_profile(profile);
        stream.add_servicelevel(ServiceLevel::new("rawhide"));
        stream.add_component(RpmComponent::new("foo").with_rationale("main package"));

        let mut deps = Dependencies::new();
        deps.add_buildtime_stream("platform", "f30");
        deps.add_runtime_stream("platform", "f30");
        stream.add_dependencies(deps);
        stream
    }

    #[test]
    fn test_copy_is_deep_and_equal() {
        let original: ModuleStream = populated().into();
        let mut copy = original.copy(None, None);
        assert_eq!(original, copy);

        copy.add_rpm_api("bar");
        assert_ne!(original, copy);
        assert!(!original.rpm_api().contains("bar"));
    }

    #[test]
    fn test_copy_with_rename() {
        let original: ModuleStream = populated().into();
        let renamed = original.copy(Some("baz"), Some("qux"));
        assert_eq!(renamed.module_name(), Some("baz"));
        assert_eq!(renamed.stream_name(), Some("qux"));
        assert_eq!(renamed.rpm_api(), original.rpm_api());
        assert_eq!(renamed.profiles(), original.profiles());
    }

    #[test]
    fn test_copy_with_empty_rename_keeps_identity() {
        let original: ModuleStream = populated().into();
        let copy = original.copy(Some(""), Some(""));
        assert_eq!(copy.module_name(), Some("foo"));
        assert_eq!(copy.stream_name(), Some("bar"));
        assert_eq!(copy, original);
    }

    #[test]
    fn test_equal_after_different_call_sequences() {
        let mut a = populated();
        let b = populated();

        a.add_rpm_api("bar");
        a.add_rpm_api("foo");
        a.remove_rpm_api("bar");
        assert_eq!(a, b);

        a.add_module_license("MIT");
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_field_difference() {
        let base = populated();

        let mut other = populated();
        other.set_version(1);
        assert_ne!(base, other);

        let mut other = populated();
        other.add_content_license("GPL");
        assert_ne!(base, other);

        let mut other = populated();
        other.clear_dependencies();
        assert_ne!(base, other);
    }

    #[test]
    fn test_dependency_order_matters() {
        let mut first = Dependencies::new();
        first.add_buildtime_stream("platform", "f30");
        let mut second = Dependencies::new();
        second.add_buildtime_stream("platform", "f31");

        let mut a = ModuleStreamV2::new(Some("foo"), Some("bar"));
        a.add_dependencies(first.clone());
        a.add_dependencies(second.clone());
        let mut b = ModuleStreamV2::new(Some("foo"), Some("bar"));
        b.add_dependencies(second);
        b.add_dependencies(first);
        assert_ne!(a, b);
    }

    #[test]
    fn test_v1_and_v2_differ() {
        let v1: ModuleStream = ModuleStreamV1::new(Some("foo"), Some("bar")).into();
        let v2: ModuleStream = ModuleStreamV2::new(Some("foo"), Some("bar")).into();
        assert_ne!(v1, v2);
    }
}

mod dependency_tests {
    use super::*;

    #[test]
    fn test_v1_depends_on_stream() {
        let stream = ModuleStream::read_str(DEPENDSON_V1, &ParseConfig::default()).unwrap();
        assert!(stream.depends_on_stream("platform", "f30"));
        assert!(stream.build_depends_on_stream("platform", "f30"));
        assert!(!stream.depends_on_stream("platform", "f28"));
        assert!(!stream.build_depends_on_stream("platform", "f28"));
        assert!(!stream.depends_on_stream("base", "f30"));
        assert!(!stream.build_depends_on_stream("base", "f30"));
    }

    #[test]
    fn test_v2_depends_on_stream() {
        let stream = ModuleStream::read_str(DEPENDSON_V2, &ParseConfig::default()).unwrap();
        assert!(stream.depends_on_stream("platform", "f30"));
        assert!(stream.build_depends_on_stream("platform", "f30"));
        // Negated entries never count as a dependency
        assert!(!stream.depends_on_stream("platform", "f28"));
        assert!(!stream.build_depends_on_stream("platform", "f28"));
        assert!(!stream.depends_on_stream("base", "f30"));
        // Any dependency set may match
        assert!(stream.depends_on_stream("platform", "f29"));
    }

    #[test]
    fn test_empty_stream_list_is_kept() {
        let mut deps = Dependencies::new();
        deps.set_empty_buildtime_dependencies_for_module("platform");
        assert!(deps.buildtime_streams("platform").unwrap().is_empty());
        assert!(!deps.is_empty());

        deps.add_buildtime_stream("platform", "f30");
        deps.add_buildtime_stream("platform", "f30");
        assert_eq!(deps.buildtime_streams("platform").unwrap().len(), 1);
    }
}

mod collection_tests {
    use super::*;

    #[test]
    fn test_components_by_kind() {
        let mut stream = ModuleStreamV2::new(Some("foo"), Some("bar"));
        stream.add_component(RpmComponent::new("rpm-a"));
        stream.add_component(ModuleComponent::new("module-a"));
        assert!(stream.rpm_component("rpm-a").is_some());
        assert!(stream.module_component("module-a").is_some());
        assert!(stream.rpm_component("module-a").is_none());

        assert!(stream.remove_rpm_component("rpm-a").is_some());
        assert!(stream.rpm_components().is_empty());
    }

    #[test]
    fn test_rpm_map_entry_lookup() {
        let mut stream = ModuleStreamV2::new(Some("foo"), Some("bar"));
        let entry = RpmMapEntry::new("bar", 0, "1.23", "1.module_deadbeef", "x86_64");
        stream.set_rpm_artifact_map_entry(entry.clone(), "sha256", "baddad");
        assert_eq!(stream.rpm_artifact_map_entry("sha256", "baddad"), Some(&entry));
        assert_eq!(stream.rpm_artifact_map_entry("sha256", "other"), None);
        assert_eq!(stream.rpm_artifact_map_entry("sha1", "baddad"), None);
    }

    #[test]
    fn test_servicelevel_eol() {
        let mut level = ServiceLevel::new("bug_fixes");
        assert!(level.eol_string().is_none());
        assert!(level.set_eol_ymd(2077, 10, 23));
        assert_eq!(level.eol_string().as_deref(), Some("2077-10-23"));
        assert!(!level.set_eol_ymd(2077, 2, 30));
    }
}

mod xmd_tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct BuildInfo {
        koji_tag: String,
        rpms: BTreeMap<String, String>,
    }

    #[test]
    fn test_typed_xmd_round_trip() {
        let info = BuildInfo {
            koji_tag: "module-foo-bar".to_string(),
            rpms: BTreeMap::from([("foo".to_string(), "abc123".to_string())]),
        };
        let mut stream = ModuleStreamV2::new(Some("foo"), Some("bar"));
        stream.set_xmd_from(&info).unwrap();
        let back: Option<BuildInfo> = stream.xmd_as().unwrap();
        assert_eq!(back, Some(info));
    }

    #[test]
    fn test_xmd_preserved_through_read() {
        let yaml = "document: modulemd\nversion: 2\ndata:\n  summary: s\n  description: d\n  license:\n    module: [MIT]\n  xmd:\n    mbs:\n      commit: '0123'\n      buildrequires: {platform: {ref: f30}}\n    flags: [1, true, ~]\n";
        let stream = ModuleStream::read_str(yaml, &ParseConfig::default()).unwrap();
        let output = stream.to_yaml_string().unwrap();
        assert!(output.contains("  xmd:\n    mbs:\n      commit: '0123'\n      buildrequires:\n        platform:\n          ref: f30\n    flags:\n    - 1\n    - true\n    - ~\n"));
    }
}

mod round_trip_tests {
    use super::*;
    use modulemd::yaml::{Mapping, Node};

    fn read_back(stream: &ModuleStream) -> ModuleStream {
        let yaml = stream.to_yaml_string().unwrap();
        ModuleStream::read_str(&yaml, &ParseConfig::default()).unwrap()
    }

    fn populated_v2() -> ModuleStreamV2 {
        let mut stream = ModuleStreamV2::new(Some("foo"), Some("latest"));
        stream.set_version(20190101000000);
        stream.set_context(Some("c0ffee43"));
        stream.set_arch(Some("x86_64"));
        stream.set_summary(Some("An example module"));
        stream.set_description(Some(
            "A module for the demonstration of the metadata format. Also, the obligatory \
             lorem ipsum dolor sit amet goes right here.",
        ));
        stream.set_community(Some("http://www.example.com/"));
        stream.set_documentation(Some("http://www.example.com/docs"));
        stream.set_tracker(Some("http://www.example.com/bugs"));
        stream.add_module_license("MIT");
        stream.add_content_license("GPL-2.0-or-later");
        stream.add_content_license("Beerware");

        let mut rawhide = ServiceLevel::new("rawhide");
        assert!(rawhide.set_eol_ymd(2077, 10, 23));
        stream.add_servicelevel(rawhide);
        stream.add_servicelevel(ServiceLevel::new("stable_api"));

        let mut deps = Dependencies::new();
        deps.add_buildtime_stream("platform", "-f28");
        deps.add_buildtime_stream("platform", "f30");
        deps.add_runtime_stream("platform", "f30");
        deps.set_empty_runtime_dependencies_for_module("runtime");
        stream.add_dependencies(deps);
        let mut extra = Dependencies::new();
        extra.add_buildtime_stream("platform", "f29");
        stream.add_dependencies(extra);

        let mut profile = Profile::new("default");
        profile.set_description(Some("An example profile."));
        profile.add_rpm("bar");
        profile.add_rpm("bar-extras");
        stream.add_profile(profile);
        stream.add_profile(Profile::new("empty"));

        stream.add_rpm_api("bar");
        stream.add_rpm_api("bar-devel");
        stream.add_rpm_filter("baz-nonfoo");
        stream.buildopts_mut().set_rpm_macros(Some("%demo_rpm_macro 1\n"));
        stream.buildopts_mut().add_rpm_to_whitelist("fooscl-1-bar");
        stream.buildopts_mut().add_arch("x86_64");
        stream.buildopts_mut().add_arch("aarch64");

        let mut bar = RpmComponent::new("bar").with_rationale("We need this to demonstrate stuff.");
        bar.package_name = Some("bar-real".to_string());
        bar.repository = Some("https://pagure.io/bar.git".to_string());
        bar.cache = Some("https://example.com/cache".to_string());
        bar.reference = Some("26ca0c0".to_string());
        bar.add_restricted_arch("x86_64");
        bar.add_multilib_arch("x86_64");
        stream.add_component(bar);
        let mut baz = RpmComponent::new("baz").with_rationale("Demonstrates buildafter.");
        baz.add_buildafter("bar");
        stream.add_component(baz);
        let mut included = ModuleComponent::new("includedmodule").with_rationale("Just because.");
        included.repository = Some("https://pagure.io/includedmodule.git".to_string());
        included.reference = Some("somecoolbranchname".to_string());
        stream.add_component(included);

        stream.add_rpm_artifact("bar-0:1.23-1.module_deadbeef.x86_64");
        stream.set_rpm_artifact_map_entry(
            RpmMapEntry::new("bar", 0, "1.23", "1.module_deadbeef", "x86_64"),
            "sha256",
            "ee47083ed80146eb2c84e9a94d0836393912185dcda62b9d93ee0c2ea5dc795b",
        );

        let mut xmd = Mapping::new();
        xmd.insert("some_key", "some_data");
        xmd.insert("nothing", Node::null());
        stream.set_xmd(Some(xmd.into()));
        stream
    }

    fn populated_v1() -> ModuleStreamV1 {
        let mut stream = ModuleStreamV1::new(Some("foo"), Some("stable"));
        stream.set_version(1);
        stream.set_summary(Some("An example module"));
        stream.set_description(Some("A v1 module."));
        stream.add_module_license("MIT");
        stream.add_content_license("Beerware");
        let mut rawhide = ServiceLevel::new("rawhide");
        assert!(rawhide.set_eol_ymd(2077, 10, 23));
        stream.add_servicelevel(rawhide);
        stream.add_buildtime_requirement("platform", "f30");
        stream.add_runtime_requirement("platform", "f30");

        let mut profile = Profile::new("default");
        profile.add_rpm("bar");
        stream.add_profile(profile);
        stream.add_rpm_api("bar");
        stream.add_rpm_filter("baz");
        stream.buildopts_mut().set_rpm_macros(Some("%demo_rpm_macro 1\n"));

        let mut bar = RpmComponent::new("bar").with_rationale("Main package.");
        bar.repository = Some("https://pagure.io/bar.git".to_string());
        bar.cache = Some("https://example.com/cache".to_string());
        bar.reference = Some("26ca0c0".to_string());
        bar.buildorder = 10;
        bar.add_restricted_arch("x86_64");
        bar.add_multilib_arch("x86_64");
        stream.add_component(bar);
        let mut included = ModuleComponent::new("includedmodule").with_rationale("Just because.");
        included.reference = Some("main".to_string());
        included.buildorder = 20;
        stream.add_component(included);
        stream.add_rpm_artifact("bar-0:1.23-1.module_deadbeef.x86_64");
        stream.set_xmd(Some(Mapping::new().into()));
        stream
    }

    #[test]
    fn test_populated_streams_survive_a_round_trip() {
        let v2: ModuleStream = populated_v2().into();
        assert_eq!(read_back(&v2), v2);

        let v1: ModuleStream = populated_v1().into();
        assert_eq!(read_back(&v1), v1);
    }

    #[test]
    fn test_null_like_names_stay_strings() {
        for text in ["null", "~", "Null", "NULL"] {
            let mut stream = populated_v2();
            stream.set_module_name(Some(text));
            stream.set_stream_name(Some(text));
            stream.set_context(Some(text));
            stream.set_arch(Some(text));
            stream.set_summary(Some(text));
            stream.add_rpm_api(text);
            let mut profile = Profile::new(text);
            profile.add_rpm(text);
            stream.add_profile(profile);

            let stream: ModuleStream = stream.into();
            let back = read_back(&stream);
            assert_eq!(back.stream_name(), Some(text));
            assert_eq!(back.context(), Some(text));
            assert_eq!(back, stream);
        }
    }

    #[test]
    fn test_trailing_whitespace_is_normalised_on_both_sides() {
        let mut stream = populated_v2();
        stream.set_summary(Some("Summary "));
        stream.set_description(Some("Line one.\n"));
        let mut profile = Profile::new("padded");
        profile.set_description(Some("Padded profile.\n\n"));
        stream.add_profile(profile);
        stream.add_component(RpmComponent::new("padded").with_rationale("Trailing space. "));

        assert_eq!(stream.summary(), Some("Summary"));
        assert_eq!(stream.description(), Some("Line one."));

        let stream: ModuleStream = stream.into();
        assert_eq!(read_back(&stream), stream);
    }

    #[test]
    fn test_null_xmd_is_unset() {
        let mut stream = populated_v2();
        stream.set_xmd(Some(Node::null()));
        assert!(stream.xmd().is_none());

        let stream: ModuleStream = stream.into();
        let back = read_back(&stream);
        assert!(back.xmd().is_none());
        assert_eq!(back, stream);
    }

    #[test]
    fn test_empty_xmd_is_kept() {
        let stream: ModuleStream = populated_v1().into();
        let back = read_back(&stream);
        assert_eq!(back.xmd(), Some(&Node::from(Mapping::new())));
    }
}
