//! Component models
//!
//! Components are the sources a stream is built from: RPM packages and other
//! modules bundled into it. Build sequencing uses either a numeric
//! `buildorder` or a `buildafter` set of component names, never both.

use super::free_text;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Shared view used by the build-ordering checks
pub trait ComponentOrdering {
    fn name(&self) -> &str;
    fn buildorder(&self) -> i64;
    fn buildafter(&self) -> &BTreeSet<String>;
}

/// An RPM package built as part of the stream
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpmComponent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    /// Real package name when the component key is an alias
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Build batch; 0 is the default batch
    #[serde(default)]
    pub buildorder: i64,
    #[serde(default)]
    pub buildafter: BTreeSet<String>,
    #[serde(default)]
    pub arches: BTreeSet<String>,
    #[serde(default)]
    pub multilib: BTreeSet<String>,
}

impl RpmComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        let rationale: String = rationale.into();
        self.set_rationale(Some(&rationale));
        self
    }

    pub fn set_rationale(&mut self, rationale: Option<&str>) {
        self.rationale = free_text(rationale);
    }

    pub fn add_buildafter(&mut self, component: impl Into<String>) {
        self.buildafter.insert(component.into());
    }

    pub fn add_restricted_arch(&mut self, arch: impl Into<String>) {
        self.arches.insert(arch.into());
    }

    pub fn add_multilib_arch(&mut self, arch: impl Into<String>) {
        self.multilib.insert(arch.into());
    }
}

impl ComponentOrdering for RpmComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn buildorder(&self) -> i64 {
        self.buildorder
    }

    fn buildafter(&self) -> &BTreeSet<String> {
        &self.buildafter
    }
}

/// Another module bundled into the stream
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleComponent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default)]
    pub buildorder: i64,
    #[serde(default)]
    pub buildafter: BTreeSet<String>,
}

impl ModuleComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        let rationale: String = rationale.into();
        self.set_rationale(Some(&rationale));
        self
    }

    pub fn set_rationale(&mut self, rationale: Option<&str>) {
        self.rationale = free_text(rationale);
    }

    pub fn add_buildafter(&mut self, component: impl Into<String>) {
        self.buildafter.insert(component.into());
    }
}

impl ComponentOrdering for ModuleComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn buildorder(&self) -> i64 {
        self.buildorder
    }

    fn buildafter(&self) -> &BTreeSet<String> {
        &self.buildafter
    }
}

/// Either kind of component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    Rpm(RpmComponent),
    Module(ModuleComponent),
}

impl Component {
    pub fn name(&self) -> &str {
        match self {
            Component::Rpm(c) => &c.name,
            Component::Module(c) => &c.name,
        }
    }

    pub fn rationale(&self) -> Option<&str> {
        match self {
            Component::Rpm(c) => c.rationale.as_deref(),
            Component::Module(c) => c.rationale.as_deref(),
        }
    }

    pub fn buildorder(&self) -> i64 {
        match self {
            Component::Rpm(c) => c.buildorder,
            Component::Module(c) => c.buildorder,
        }
    }

    pub fn buildafter(&self) -> &BTreeSet<String> {
        match self {
            Component::Rpm(c) => &c.buildafter,
            Component::Module(c) => &c.buildafter,
        }
    }
}

impl From<RpmComponent> for Component {
    fn from(component: RpmComponent) -> Self {
        Component::Rpm(component)
    }
}

impl From<ModuleComponent> for Component {
    fn from(component: ModuleComponent) -> Self {
        Component::Module(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_dispatch() {
        let mut rpm = RpmComponent::new("bar").with_rationale("needed");
        rpm.add_buildafter("baz");
        rpm.add_buildafter("baz");
        let component = Component::from(rpm);
        assert_eq!(component.name(), "bar");
        assert_eq!(component.rationale(), Some("needed"));
        assert_eq!(component.buildafter().len(), 1);
        assert_eq!(component.buildorder(), 0);

        let module = Component::from(ModuleComponent::new("included"));
        assert!(matches!(module, Component::Module(_)));
    }
}
