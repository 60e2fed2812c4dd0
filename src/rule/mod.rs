//! Substitution rules: declarative rewrites of a matched type's static
//! surface.
//!
//! A rule is bound to one target type and guarded by a presence probe. On
//! activation it (1) captures the original declared values of selected
//! fields under rule-local alias names, (2) recomputes selected other
//! fields from those aliases, and (3) replaces the bodies of selected
//! static methods. A rule whose guard fails is a complete no-op.
//!
//! # Components
//!
//! - [`registry`] - Build-scoped rule collection with overlap rejection

pub mod registry;

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SubstError};
use crate::model::{BuildModel, DeclaredValue, Implementation, MethodSig};
use crate::probe::{probe, TargetDescriptor};

// ============================================================================
// Rule parts
// ============================================================================

/// Binds a rule-local alias name to an existing field's declared value.
///
/// Aliasing is a read-through: it never mutates the model, and it captures
/// the original compile-time constant rather than the current effective
/// value, so recomputed fields track the original source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAlias {
    pub alias: String,
    pub source: String,
}

/// How an overridden field's new value is computed from the aliases.
///
/// A small expression form evaluated once at application time; both
/// variants are pure functions of original declared values.
#[derive(Debug, Clone)]
pub enum Recompute {
    /// Use the aliased value unchanged.
    FromAlias(String),
    /// Apply a pure function to the aliased value.
    Map(String, fn(&DeclaredValue) -> DeclaredValue),
}

impl Recompute {
    fn eval(&self, bindings: &FxHashMap<String, DeclaredValue>) -> Result<DeclaredValue> {
        match self {
            Recompute::FromAlias(alias) => bindings
                .get(alias)
                .cloned()
                .ok_or_else(|| SubstError::AliasNotBound(alias.clone())),
            Recompute::Map(alias, f) => bindings
                .get(alias)
                .map(f)
                .ok_or_else(|| SubstError::AliasNotBound(alias.clone())),
        }
    }
}

/// Replaces an overridden field's effective value.
#[derive(Debug, Clone)]
pub struct FieldOverride {
    pub field: String,
    pub recompute: Recompute,
}

/// Swaps a method's body behind its stable signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodReplacement {
    pub sig: MethodSig,
    pub implementation: Implementation,
}

/// Terminal outcome of a rule for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOutcome {
    /// The guard held and the substitution was installed.
    Applied,
    /// The guard failed; the target model was left untouched.
    Skipped,
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleOutcome::Applied => write!(f, "applied"),
            RuleOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

// ============================================================================
// SubstitutionRule
// ============================================================================

/// A declarative substitution of selected static members of one target
/// type, applied at most once per build and only when its presence probe
/// holds.
///
/// Rules are constructed at build start, never mutated after registration,
/// and discarded when the build ends.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    name: String,
    target: TargetDescriptor,
    field_aliases: Vec<FieldAlias>,
    field_overrides: Vec<FieldOverride>,
    method_replacements: Vec<MethodReplacement>,
}

impl SubstitutionRule {
    /// Create a rule bound to `target`, identified by `name` in reports and
    /// error messages.
    pub fn new(name: impl Into<String>, target: TargetDescriptor) -> Self {
        Self {
            name: name.into(),
            target,
            field_aliases: Vec::new(),
            field_overrides: Vec::new(),
            method_replacements: Vec::new(),
        }
    }

    /// Bind `alias` to the declared value of the target's `source` field.
    pub fn alias_field(mut self, alias: impl Into<String>, source: impl Into<String>) -> Self {
        self.field_aliases.push(FieldAlias {
            alias: alias.into(),
            source: source.into(),
        });
        self
    }

    /// Override `field` with the result of `recompute`.
    pub fn override_field(mut self, field: impl Into<String>, recompute: Recompute) -> Self {
        self.field_overrides.push(FieldOverride {
            field: field.into(),
            recompute,
        });
        self
    }

    /// Replace the body of the method with signature `sig`.
    pub fn replace_method(mut self, sig: MethodSig, implementation: Implementation) -> Self {
        self.method_replacements.push(MethodReplacement {
            sig,
            implementation,
        });
        self
    }

    /// The rule's identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule's activation target.
    pub fn target(&self) -> &TargetDescriptor {
        &self.target
    }

    /// Apply this rule to `model`: evaluate the guard once, then install
    /// the substitution if it held.
    ///
    /// A failed guard returns [`RuleOutcome::Skipped`] with the model
    /// untouched. A mutation failure after a passing guard is fatal: it
    /// means the rule's declarations and the target's actual shape
    /// disagree.
    pub fn apply(&self, model: &mut BuildModel) -> Result<RuleOutcome> {
        if !probe(model, &self.target) {
            debug!(rule = %self.name, target = %self.target.type_name(), "guard failed, skipping");
            return Ok(RuleOutcome::Skipped);
        }
        self.apply_unguarded(model)?;
        Ok(RuleOutcome::Applied)
    }

    /// Install the substitution without re-evaluating the guard.
    ///
    /// The pass calls this after its own probe phase so the guard is
    /// evaluated exactly once per rule per build.
    pub(crate) fn apply_unguarded(&self, model: &mut BuildModel) -> Result<()> {
        self.install(model)
            .map_err(|source| SubstError::RuleApplication {
                rule: self.name.clone(),
                source: Box::new(source),
            })
    }

    fn install(&self, model: &mut BuildModel) -> Result<()> {
        let handle = model
            .resolve_type(self.target.type_name())
            .ok_or_else(|| SubstError::TypeNotFound(self.target.type_name().to_string()))?;

        // Capture every alias before any mutation; reads go through the
        // declared constants, so capture order cannot observe overrides.
        let mut bindings: FxHashMap<String, DeclaredValue> = FxHashMap::default();
        for alias in &self.field_aliases {
            let value = model.declared_field(handle, &alias.source)?.clone();
            bindings.insert(alias.alias.clone(), value);
        }

        for over in &self.field_overrides {
            let value = over.recompute.eval(&bindings)?;
            debug!(
                rule = %self.name,
                field = %over.field,
                value = %value,
                "overriding field"
            );
            model.set_field(handle, &over.field, value)?;
        }

        for repl in &self.method_replacements {
            debug!(rule = %self.name, method = %repl.sig, "replacing method body");
            model.replace_method_body(handle, &repl.sig, repl.implementation.clone())?;
        }

        Ok(())
    }
}
