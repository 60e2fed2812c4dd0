//! Build-scoped substitution rule registry.
//!
//! Holds every rule registered for one build invocation and enumerates
//! them in registration order. Two rules targeting the same type are
//! rejected at registration time: the rules give no resolution policy for
//! overlapping members, and silently picking one would make the outcome
//! order-dependent.

use rustc_hash::FxHashMap;

use crate::error::{Result, SubstError};
use crate::rule::SubstitutionRule;

/// Registry of substitution rules for a single build invocation.
///
/// Initialized at build start, discarded at build end; no cross-build
/// persistence.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<SubstitutionRule>,
    by_target: FxHashMap<String, usize>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule.
    ///
    /// Fails if another registered rule already targets the same type,
    /// naming both rules.
    pub fn register(&mut self, rule: SubstitutionRule) -> Result<()> {
        let type_name = rule.target().type_name().to_string();
        if let Some(&index) = self.by_target.get(&type_name) {
            return Err(SubstError::OverlappingRules {
                type_name,
                first: self.rules[index].name().to_string(),
                second: rule.name().to_string(),
            });
        }
        self.by_target.insert(type_name, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Enumerate rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SubstitutionRule> {
        self.rules.iter()
    }

    /// Look up a rule by its identifier.
    pub fn get(&self, name: &str) -> Option<&SubstitutionRule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
