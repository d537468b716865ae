//! Module defaults import

use super::config::ParseConfig;
use super::fields::{expect_mapping, read_optional_string, read_string_set, unknown_key};
use crate::models::defaults::Defaults;
use crate::validation::ValidationError;
use crate::yaml::Node;

/// Read the `data` mapping of a `modulemd-defaults` document.
pub fn parse_defaults(data: &Node, config: &ParseConfig) -> Result<Defaults, ValidationError> {
    let mapping = expect_mapping(data, "data")?;
    let module = mapping
        .get("module")
        .map(|node| read_optional_string(node, "module"))
        .transpose()?
        .flatten()
        .ok_or_else(|| ValidationError::MissingField("module".to_string()))?;

    let mut defaults = Defaults::new(module);
    for (key, value) in mapping.iter() {
        match key {
            "module" => {}
            "stream" => {
                let stream = read_optional_string(value, "stream")?;
                defaults.set_default_stream(stream.as_deref());
            }
            "profiles" => {
                for (stream, profiles) in expect_mapping(value, "profiles")?.iter() {
                    defaults.set_empty_default_profiles_for_stream(stream);
                    for profile in read_string_set(profiles, &format!("profiles.{stream}"))? {
                        defaults.add_default_profile_for_stream(stream, profile);
                    }
                }
            }
            other => unknown_key("data", other, config)?,
        }
    }
    Ok(defaults)
}
