//! Build-model type definitions.
//!
//! Core data structures for the in-memory model a closed-world build
//! constructs before reachability analysis: types with their static fields
//! (declared constants plus effective values) and static methods with
//! replaceable bodies.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Handles
// ============================================================================

/// Index of a type in the build model's type table.
///
/// Handles are minted by [`BuildModel::add_type`](crate::model::BuildModel::add_type)
/// and are only meaningful for the model that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeHandle(pub(crate) u32);

impl TypeHandle {
    /// Create a handle from a raw table index.
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw table index.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

// ============================================================================
// Values
// ============================================================================

/// A static value the build model can hold: a field's compile-time constant
/// or the constant result of a foldable method body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclaredValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    /// A pre-built singleton instance of the named type.
    Instance(String),
}

impl DeclaredValue {
    /// Kind name used in mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            DeclaredValue::Null => "null",
            DeclaredValue::Bool(_) => "bool",
            DeclaredValue::Int(_) => "int",
            DeclaredValue::Str(_) => "string",
            DeclaredValue::Instance(_) => "instance",
        }
    }

    /// String content for `Str` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DeclaredValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Type name for `Instance` values.
    pub fn instance_of(&self) -> Option<&str> {
        match self {
            DeclaredValue::Instance(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for DeclaredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredValue::Null => write!(f, "null"),
            DeclaredValue::Bool(b) => write!(f, "{}", b),
            DeclaredValue::Int(i) => write!(f, "{}", i),
            DeclaredValue::Str(s) => write!(f, "{:?}", s),
            DeclaredValue::Instance(t) => write!(f, "instance of {}", t),
        }
    }
}

impl From<&str> for DeclaredValue {
    fn from(s: &str) -> Self {
        DeclaredValue::Str(s.to_string())
    }
}

impl From<String> for DeclaredValue {
    fn from(s: String) -> Self {
        DeclaredValue::Str(s)
    }
}

impl From<i64> for DeclaredValue {
    fn from(i: i64) -> Self {
        DeclaredValue::Int(i)
    }
}

impl From<bool> for DeclaredValue {
    fn from(b: bool) -> Self {
        DeclaredValue::Bool(b)
    }
}

// ============================================================================
// Members
// ============================================================================

/// Signature of a static method: name plus ordered parameter type names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSig {
    pub name: String,
    pub param_types: Vec<String>,
}

impl MethodSig {
    /// Create a method signature.
    pub fn new<I, S>(name: impl Into<String>, param_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            param_types: param_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Signature of a parameterless method.
    pub fn nullary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_types: Vec::new(),
        }
    }
}

impl fmt::Display for MethodSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.param_types.join(", "))
    }
}

/// A method body as the build model sees it.
///
/// A body is its outgoing edges (the qualified type names it references,
/// which reachability analysis follows) plus an optional constant result
/// for bodies the build can fold to a fixed value. Replacements installed by
/// substitution rules are typically constant-foldable; original bodies of
/// interesting targets typically are not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implementation {
    /// Qualified type names this body references.
    pub references: Vec<String>,
    /// Fixed value the body produces regardless of arguments, when foldable.
    pub constant_result: Option<DeclaredValue>,
}

impl Implementation {
    /// An opaque body: known references, no foldable result.
    pub fn opaque<I, S>(references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            references: references.into_iter().map(Into::into).collect(),
            constant_result: None,
        }
    }

    /// A body that always produces `value`.
    ///
    /// For `Instance` values the referenced type is recorded as the body's
    /// single outgoing edge, so reachability sees exactly the fallback type.
    pub fn constant(value: DeclaredValue) -> Self {
        let references = match &value {
            DeclaredValue::Instance(t) => vec![t.clone()],
            _ => Vec::new(),
        };
        Self {
            references,
            constant_result: Some(value),
        }
    }

    /// The constant result, if this body is foldable.
    pub fn evaluate(&self) -> Option<&DeclaredValue> {
        self.constant_result.as_ref()
    }
}

/// A static field: its name, the declared compile-time constant, and the
/// effective value after any substitutions.
///
/// `declared` is captured at model construction and never mutated;
/// `set_field` changes only `value`. Alias capture reads `declared`, which
/// is what keeps substitution application idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub declared: DeclaredValue,
    pub value: DeclaredValue,
}

impl FieldDef {
    /// Create a field whose effective value starts at its declared constant.
    pub fn new(name: impl Into<String>, declared: DeclaredValue) -> Self {
        let value = declared.clone();
        Self {
            name: name.into(),
            declared,
            value,
        }
    }

    /// Whether a substitution has changed this field's effective value.
    pub fn is_overridden(&self) -> bool {
        self.value != self.declared
    }
}

/// A static method: signature plus current body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub sig: MethodSig,
    pub implementation: Implementation,
}

impl MethodDef {
    pub fn new(sig: MethodSig, implementation: Implementation) -> Self {
        Self {
            sig,
            implementation,
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// Whether a type's metadata resolved cleanly.
///
/// A broken type is present on the classpath but cannot be linked (for
/// example a supertype or member type is missing). Resolution of a broken
/// type fails, which presence probes fold into "not applicable".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    Linked,
    Broken(String),
}

impl LinkState {
    pub fn is_linked(&self) -> bool {
        matches!(self, LinkState::Linked)
    }
}

/// A type as the build model sees it: qualified name, link state, static
/// fields, and static methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub type_name: String,
    pub link_state: LinkState,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
}

impl TypeDef {
    /// Create an empty, cleanly linked type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            link_state: LinkState::Linked,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add a static field with its declared constant.
    pub fn with_field(mut self, name: impl Into<String>, declared: DeclaredValue) -> Self {
        self.fields.push(FieldDef::new(name, declared));
        self
    }

    /// Add a static method.
    pub fn with_method(mut self, sig: MethodSig, implementation: Implementation) -> Self {
        self.methods.push(MethodDef::new(sig, implementation));
        self
    }

    /// Mark the type's metadata as unresolvable.
    pub fn with_broken_link(mut self, reason: impl Into<String>) -> Self {
        self.link_state = LinkState::Broken(reason.into());
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut FieldDef> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Look up a method by exact signature (name plus parameter types).
    pub fn method(&self, sig: &MethodSig) -> Option<&MethodDef> {
        self.methods.iter().find(|m| &m.sig == sig)
    }

    pub(crate) fn method_mut(&mut self, sig: &MethodSig) -> Option<&mut MethodDef> {
        self.methods.iter_mut().find(|m| &m.sig == sig)
    }
}
