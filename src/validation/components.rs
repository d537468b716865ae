//! Component validation functionality
//!
//! Validates build ordering within one kind of component and the
//! architecture restrictions of rpm components.

use petgraph::algo::tarjan_scc;
use petgraph::{Directed, Graph};
use std::collections::{BTreeMap, HashMap};

use super::ValidationError;
use crate::models::buildopts::Buildopts;
use crate::models::component::{ComponentOrdering, RpmComponent};

/// Check buildorder/buildafter usage of a set of components.
///
/// A component may not use both schemes, a stream may not mix them, every
/// buildafter name must be a component of the same kind, and buildafter
/// links may not form a cycle.
pub fn validate_build_ordering<C: ComponentOrdering>(
    components: &BTreeMap<String, C>,
) -> Result<(), ValidationError> {
    let mut uses_buildafter = None;
    let mut uses_buildorder = None;

    for component in components.values() {
        let has_after = !component.buildafter().is_empty();
        let has_order = component.buildorder() != 0;
        if has_after && has_order {
            return Err(ValidationError::BuildOrderConflict {
                component: component.name().to_string(),
            });
        }
        if has_after && uses_buildafter.is_none() {
            uses_buildafter = Some(component.name());
        }
        if has_order && uses_buildorder.is_none() {
            uses_buildorder = Some(component.name());
        }
    }

    if let (Some(after), Some(order)) = (uses_buildafter, uses_buildorder) {
        return Err(ValidationError::MixedBuildScheme {
            buildafter: after.to_string(),
            buildorder: order.to_string(),
        });
    }
    if uses_buildafter.is_none() {
        return Ok(());
    }

    let mut graph = Graph::<&str, (), Directed>::new();
    let nodes: HashMap<&str, _> = components
        .keys()
        .map(|name| (name.as_str(), graph.add_node(name.as_str())))
        .collect();

    for (name, component) in components {
        for dependency in component.buildafter() {
            let Some(&target) = nodes.get(dependency.as_str()) else {
                return Err(ValidationError::UnknownBuildAfter {
                    component: name.clone(),
                    dependency: dependency.clone(),
                });
            };
            graph.add_edge(nodes[name.as_str()], target, ());
        }
    }

    for scc in tarjan_scc(&graph) {
        let cyclic = scc.len() > 1 || graph.contains_edge(scc[0], scc[0]);
        if cyclic {
            let mut names: Vec<String> = scc.iter().map(|&idx| graph[idx].to_string()).collect();
            names.sort();
            return Err(ValidationError::BuildAfterCycle { components: names });
        }
    }
    Ok(())
}

/// Check that rpm component arches stay within the buildopts arches.
pub fn validate_arches(
    buildopts: &Buildopts,
    components: &BTreeMap<String, RpmComponent>,
) -> Result<(), ValidationError> {
    if buildopts.arches.is_empty() {
        return Ok(());
    }
    for component in components.values() {
        if let Some(arch) = component
            .arches
            .iter()
            .find(|arch| !buildopts.arches.contains(*arch))
        {
            return Err(ValidationError::ArchNotInBuildopts {
                component: component.name.clone(),
                arch: arch.clone(),
            });
        }
    }
    Ok(())
}
