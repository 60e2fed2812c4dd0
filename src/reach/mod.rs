//! Closed-world reachability over a build model.
//!
//! The downstream consumer of the substitution pass: a transitive walk of
//! method-body references from a set of entry-point types. Types the walk
//! never reaches are pruned from the closed world; substituting away
//! dynamic-code-generation paths before this analysis runs is what makes
//! them prunable.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{BuildModel, DeclaredValue};

/// Result of a reachability walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachabilityReport {
    reachable: FxHashSet<String>,
}

impl ReachabilityReport {
    /// Whether a qualified type name was reached.
    pub fn is_reachable(&self, type_name: &str) -> bool {
        self.reachable.contains(type_name)
    }

    /// The reachable set.
    pub fn reachable(&self) -> &FxHashSet<String> {
        &self.reachable
    }

    /// Types present in `model` but never reached, sorted by name.
    pub fn pruned<'a>(&self, model: &'a BuildModel) -> Vec<&'a str> {
        let mut pruned: Vec<&str> = model
            .types()
            .iter()
            .map(|t| t.type_name.as_str())
            .filter(|name| !self.reachable.contains(*name))
            .collect();
        pruned.sort_unstable();
        pruned
    }
}

/// Walk the model from `entry_points` and report what the closed world
/// retains.
///
/// A type is reachable if it is an entry point or is referenced by a
/// method body or an instance-valued field of a reachable type. Entry
/// points absent from the model are recorded as reachable but contribute
/// no edges.
pub fn analyze_reachability<S: AsRef<str>>(
    model: &BuildModel,
    entry_points: &[S],
) -> ReachabilityReport {
    let mut reachable: FxHashSet<String> = FxHashSet::default();
    let mut worklist: Vec<String> = Vec::new();

    for entry in entry_points {
        let name = entry.as_ref().to_string();
        if reachable.insert(name.clone()) {
            worklist.push(name);
        }
    }

    while let Some(name) = worklist.pop() {
        let Some(handle) = model.resolve_type(&name) else {
            continue;
        };
        let def = model.type_def(handle);

        let field_refs = def
            .fields
            .iter()
            .filter_map(|f| match &f.value {
                DeclaredValue::Instance(t) => Some(t.as_str()),
                _ => None,
            });
        let method_refs = def
            .methods
            .iter()
            .flat_map(|m| m.implementation.references.iter().map(String::as_str));

        for referenced in field_refs.chain(method_refs) {
            if !reachable.contains(referenced) {
                reachable.insert(referenced.to_string());
                worklist.push(referenced.to_string());
            }
        }
    }

    debug!(
        entry_points = entry_points.len(),
        reachable = reachable.len(),
        "reachability walk complete"
    );
    ReachabilityReport { reachable }
}
