//! Presence probing for optional build-time dependencies.
//!
//! A probe decides whether a target type is loadable and exposes a required
//! set of members, without ever failing the build: every failure mode
//! (type absent, metadata unlinkable, member missing) folds into a plain
//! `false`. That totality is what lets a build enumerate many speculative
//! substitution rules against environments where the optional dependency is
//! entirely absent.
//!
//! Probing is load-without-initialize: only names and link state are
//! inspected, never a field value or a method body. The probe borrows the
//! model immutably and cannot mutate it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::BuildModel;
use crate::model::TypeDef;

// ============================================================================
// Descriptors
// ============================================================================

/// Which member namespace a signature refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberKind {
    Field,
    Method,
}

/// A member a target type must expose for a rule to be applicable.
///
/// Used only for presence checking, never for invocation. Methods match by
/// name plus exact ordered parameter-type list; fields by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberSignature {
    Field { name: String },
    Method { name: String, param_types: Vec<String> },
}

impl MemberSignature {
    /// Require a field by name.
    pub fn field(name: impl Into<String>) -> Self {
        MemberSignature::Field { name: name.into() }
    }

    /// Require a method by name and ordered parameter type names.
    pub fn method<I, S>(name: impl Into<String>, param_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemberSignature::Method {
            name: name.into(),
            param_types: param_types.into_iter().map(Into::into).collect(),
        }
    }

    /// The member's name.
    pub fn name(&self) -> &str {
        match self {
            MemberSignature::Field { name } => name,
            MemberSignature::Method { name, .. } => name,
        }
    }

    /// The member's namespace.
    pub fn kind(&self) -> MemberKind {
        match self {
            MemberSignature::Field { .. } => MemberKind::Field,
            MemberSignature::Method { .. } => MemberKind::Method,
        }
    }

    fn present_on(&self, def: &TypeDef) -> bool {
        match self {
            MemberSignature::Field { name } => def.field(name).is_some(),
            MemberSignature::Method { name, param_types } => def
                .methods
                .iter()
                .any(|m| &m.sig.name == name && &m.sig.param_types == param_types),
        }
    }
}

impl fmt::Display for MemberSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberSignature::Field { name } => write!(f, "field {}", name),
            MemberSignature::Method { name, param_types } => {
                write!(f, "method {}({})", name, param_types.join(", "))
            }
        }
    }
}

/// What must exist for a substitution rule to be applicable: a qualified
/// type name plus the members it must expose.
///
/// Immutable; constructed once at rule-registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    type_name: String,
    required_members: Vec<MemberSignature>,
}

impl TargetDescriptor {
    /// Describe a target type with no member requirements yet.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            required_members: Vec::new(),
        }
    }

    /// Require a member on the target type.
    pub fn with_member(mut self, member: MemberSignature) -> Self {
        self.required_members.push(member);
        self
    }

    /// The target's qualified type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The members the target must expose, in declaration order.
    pub fn required_members(&self) -> &[MemberSignature] {
        &self.required_members
    }
}

// ============================================================================
// Probe
// ============================================================================

/// Decide whether `target` is applicable against `model`.
///
/// Returns `true` only if the target type resolves cleanly and every
/// required member is present. Total: no failure mode escapes as an error
/// or panic.
pub fn probe(model: &BuildModel, target: &TargetDescriptor) -> bool {
    let Some(handle) = model.resolve_type(target.type_name()) else {
        debug!(
            target = %target.type_name(),
            "probe: target type absent or unlinkable"
        );
        return false;
    };

    let def = model.type_def(handle);
    for member in target.required_members() {
        if !member.present_on(def) {
            debug!(
                target = %target.type_name(),
                member = %member,
                "probe: required member missing"
            );
            return false;
        }
    }

    true
}
