//! Configuration for document import

use serde::{Deserialize, Serialize};

/// How unknown mapping keys are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Unknown keys are a validation error
    #[default]
    Strict,
    /// Unknown keys are skipped with a warning
    Permissive,
}

/// Configuration for document import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseConfig {
    /// Unknown-key policy for the envelope and every mapping inside `data`
    pub strictness: Strictness,

    /// Run the cross-field validation pass after the structural parse
    pub validate: bool,

    /// Module name used when a stream document does not set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,

    /// Stream name used when a stream document does not set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_name: Option<String>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Strict,
            validate: true,
            module_name: None,
            stream_name: None,
        }
    }
}

impl ParseConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict configuration (the default)
    pub fn strict() -> Self {
        Self::default()
    }

    /// Configuration that ignores unknown keys
    pub fn permissive() -> Self {
        Self::builder().strictness(Strictness::Permissive).build()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ParseConfigBuilder {
        ParseConfigBuilder::default()
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }
}

/// Builder for ParseConfig
#[derive(Debug, Default)]
pub struct ParseConfigBuilder {
    config: ParseConfig,
}

impl ParseConfigBuilder {
    /// Set the unknown-key policy
    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.config.strictness = strictness;
        self
    }

    /// Enable or disable the validation pass
    pub fn validate(mut self, validate: bool) -> Self {
        self.config.validate = validate;
        self
    }

    /// Set the fallback module name
    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.config.module_name = Some(name.into());
        self
    }

    /// Set the fallback stream name
    pub fn stream_name(mut self, name: impl Into<String>) -> Self {
        self.config.stream_name = Some(name.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> ParseConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParseConfig::default();
        assert_eq!(config.strictness, Strictness::Strict);
        assert!(config.validate);
        assert!(config.module_name.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ParseConfig::builder()
            .strictness(Strictness::Permissive)
            .validate(false)
            .module_name("foo")
            .stream_name("bar")
            .build();

        assert!(!config.is_strict());
        assert!(!config.validate);
        assert_eq!(config.module_name.as_deref(), Some("foo"));
        assert_eq!(config.stream_name.as_deref(), Some("bar"));
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let config: ParseConfig =
            serde_yaml::from_str("strictness: permissive\nvalidate: true\n").unwrap();
        assert_eq!(config.strictness, Strictness::Permissive);
    }
}
