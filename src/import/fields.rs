//! Typed readers over generic nodes
//!
//! Every reader takes the dotted path of the field it reads so errors name
//! the exact location in the document.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use super::config::ParseConfig;
use crate::models::free_text;
use crate::models::service_level::EOL_FORMAT;
use crate::validation::ValidationError;
use crate::yaml::{Mapping, Node, NodeKind};

fn unexpected(field: &str, expected: NodeKind, node: &Node) -> ValidationError {
    ValidationError::UnexpectedKind {
        field: field.to_string(),
        expected,
        actual: node.kind(),
    }
}

pub(crate) fn expect_mapping<'a>(
    node: &'a Node,
    field: &str,
) -> Result<&'a Mapping, ValidationError> {
    node.as_mapping()
        .ok_or_else(|| unexpected(field, NodeKind::Mapping, node))
}

pub(crate) fn expect_sequence<'a>(
    node: &'a Node,
    field: &str,
) -> Result<&'a [Node], ValidationError> {
    node.as_sequence()
        .ok_or_else(|| unexpected(field, NodeKind::Sequence, node))
}

/// Literal text of any scalar.
pub(crate) fn read_string(node: &Node, field: &str) -> Result<String, ValidationError> {
    node.as_str()
        .map(str::to_string)
        .ok_or_else(|| unexpected(field, NodeKind::String, node))
}

/// Scalar text, with null and empty values read as unset.
pub(crate) fn read_optional_string(
    node: &Node,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    if node.is_null() {
        return Ok(None);
    }
    let text = read_string(node, field)?;
    Ok(Some(text).filter(|t| !t.is_empty()))
}

/// Free text; trailing line breaks and spaces left by block scalars are dropped.
pub(crate) fn read_text(node: &Node, field: &str) -> Result<Option<String>, ValidationError> {
    Ok(free_text(read_optional_string(node, field)?.as_deref()))
}

pub(crate) fn read_u64(node: &Node, field: &str) -> Result<u64, ValidationError> {
    let scalar = node
        .as_scalar()
        .ok_or_else(|| unexpected(field, NodeKind::Int, node))?;
    scalar.as_u64().ok_or_else(|| ValidationError::InvalidValue {
        field: field.to_string(),
        value: scalar.value().to_string(),
        reason: "expected an unsigned integer".to_string(),
    })
}

pub(crate) fn read_i64(node: &Node, field: &str) -> Result<i64, ValidationError> {
    let scalar = node
        .as_scalar()
        .ok_or_else(|| unexpected(field, NodeKind::Int, node))?;
    scalar.as_i64().ok_or_else(|| ValidationError::InvalidValue {
        field: field.to_string(),
        value: scalar.value().to_string(),
        reason: "expected an integer".to_string(),
    })
}

pub(crate) fn read_date(node: &Node, field: &str) -> Result<NaiveDate, ValidationError> {
    let text = read_string(node, field)?;
    NaiveDate::parse_from_str(&text, EOL_FORMAT).map_err(|e| ValidationError::InvalidValue {
        field: field.to_string(),
        value: text,
        reason: e.to_string(),
    })
}

/// A sequence of scalars read as a set.
pub(crate) fn read_string_set(
    node: &Node,
    field: &str,
) -> Result<BTreeSet<String>, ValidationError> {
    if node.is_null() {
        return Ok(BTreeSet::new());
    }
    expect_sequence(node, field)?
        .iter()
        .map(|item| read_string(item, field))
        .collect()
}

/// A mapping of scalar values.
pub(crate) fn read_string_map(
    node: &Node,
    field: &str,
) -> Result<BTreeMap<String, String>, ValidationError> {
    if node.is_null() {
        return Ok(BTreeMap::new());
    }
    expect_mapping(node, field)?
        .iter()
        .map(|(key, value)| {
            let path = format!("{field}.{key}");
            Ok::<_, ValidationError>((key.to_string(), read_string(value, &path)?))
        })
        .collect()
}

/// A mapping of scalar sequences.
pub(crate) fn read_string_set_map(
    node: &Node,
    field: &str,
) -> Result<BTreeMap<String, BTreeSet<String>>, ValidationError> {
    if node.is_null() {
        return Ok(BTreeMap::new());
    }
    expect_mapping(node, field)?
        .iter()
        .map(|(key, value)| {
            let path = format!("{field}.{key}");
            Ok::<_, ValidationError>((key.to_string(), read_string_set(value, &path)?))
        })
        .collect()
}

/// The `rpms:` wrapper used by api, filter and artifacts.
pub(crate) fn read_rpm_list(
    node: &Node,
    field: &str,
    config: &ParseConfig,
) -> Result<BTreeSet<String>, ValidationError> {
    let mut rpms = BTreeSet::new();
    for (key, value) in expect_mapping(node, field)?.iter() {
        match key {
            "rpms" => rpms = read_string_set(value, &format!("{field}.rpms"))?,
            other => unknown_key(field, other, config)?,
        }
    }
    Ok(rpms)
}

/// Apply the unknown-key policy.
pub(crate) fn unknown_key(
    field: &str,
    key: &str,
    config: &ParseConfig,
) -> Result<(), ValidationError> {
    if config.is_strict() {
        return Err(ValidationError::UnknownKey {
            field: field.to_string(),
            key: key.to_string(),
        });
    }
    warn!("Ignoring unknown key '{}' in '{}'", key, field);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::parse;

    #[test]
    fn test_kind_mismatch_names_field() {
        let node = parse("rpms: {a: b}\n").unwrap();
        let rpms = node.as_mapping().unwrap().get("rpms").unwrap();
        let err = read_string_set(rpms, "api.rpms").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnexpectedKind {
                field: "api.rpms".to_string(),
                expected: NodeKind::Sequence,
                actual: NodeKind::Mapping,
            }
        );
    }

    #[test]
    fn test_numbers_read_as_text() {
        let node = parse("[1.10, 0042, true]").unwrap();
        let set = read_string_set(&node, "streams").unwrap();
        assert!(set.contains("1.10"));
        assert!(set.contains("0042"));
        assert!(set.contains("true"));
    }

    #[test]
    fn test_invalid_date() {
        let node = parse("2077-13-01").unwrap();
        assert!(matches!(
            read_date(&node, "eol"),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_permissive_unknown_key() {
        assert!(unknown_key("data", "bogus", &ParseConfig::strict()).is_err());
        assert!(unknown_key("data", "bogus", &ParseConfig::permissive()).is_ok());
    }
}
