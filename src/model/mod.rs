//! In-memory build model and its mutation API.
//!
//! The model is the build pipeline's view of every type on the effective
//! classpath, constructed at build start and discarded when the build ends.
//! Substitution rules mutate it through a narrow API (resolve a type, read
//! a field, set a field, replace a method body), and reachability analysis
//! consumes the mutated result like any other reader.
//!
//! Types live in an index table with a name-keyed lookup map, so handles
//! stay copyable and snapshots serialize as a plain ordered list.
//!
//! # Components
//!
//! - [`types`] - Model data structures (types, fields, methods, values)
//! - [`snapshot`] - JSON persistence and content fingerprinting

pub mod snapshot;
pub mod types;

pub use types::{
    DeclaredValue, FieldDef, Implementation, LinkState, MethodDef, MethodSig, TypeDef, TypeHandle,
};

use rustc_hash::FxHashMap;

use crate::error::{Result, SubstError};

/// The build's mutable model of all classpath types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildModel {
    /// Type table; a [`TypeHandle`] is an index into this vector.
    types: Vec<TypeDef>,
    /// Qualified name to handle, for resolution.
    lookup: FxHashMap<String, TypeHandle>,
}

impl BuildModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a model from an ordered type table (snapshot load).
    ///
    /// Fails if two entries share a qualified name.
    pub fn from_types(types: Vec<TypeDef>) -> Result<Self> {
        let mut model = Self::new();
        for def in types {
            model.add_type(def)?;
        }
        Ok(model)
    }

    /// Register a type in the model.
    pub fn add_type(&mut self, def: TypeDef) -> Result<TypeHandle> {
        if self.lookup.contains_key(&def.type_name) {
            return Err(SubstError::DuplicateType(def.type_name));
        }
        let handle = TypeHandle::new(self.types.len() as u32);
        self.lookup.insert(def.type_name.clone(), handle);
        self.types.push(def);
        Ok(handle)
    }

    /// Resolve a type by qualified name, load-without-initialize semantics.
    ///
    /// Returns `None` when the type is absent or its metadata cannot be
    /// linked. Resolution inspects nothing beyond the name index and link
    /// state; in particular it never reads a field value.
    pub fn resolve_type(&self, name: &str) -> Option<TypeHandle> {
        let handle = self.lookup.get(name).copied()?;
        if self.type_def(handle).link_state.is_linked() {
            Some(handle)
        } else {
            None
        }
    }

    /// Whether a qualified name is present at all, broken or not.
    pub fn contains_type(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// The type definition behind a handle minted by this model.
    pub fn type_def(&self, handle: TypeHandle) -> &TypeDef {
        &self.types[handle.as_u32() as usize]
    }

    /// Read a field's effective value.
    pub fn read_field(&self, handle: TypeHandle, name: &str) -> Result<&DeclaredValue> {
        let def = self.type_def(handle);
        def.field(name)
            .map(|f| &f.value)
            .ok_or_else(|| SubstError::FieldNotFound {
                type_name: def.type_name.clone(),
                field: name.to_string(),
            })
    }

    /// Read a field's original declared constant, ignoring any mutation.
    ///
    /// This is what alias capture reads: the value the field carried when
    /// the model was constructed, not whatever a substitution may have
    /// installed since.
    pub fn declared_field(&self, handle: TypeHandle, name: &str) -> Result<&DeclaredValue> {
        let def = self.type_def(handle);
        def.field(name)
            .map(|f| &f.declared)
            .ok_or_else(|| SubstError::FieldNotFound {
                type_name: def.type_name.clone(),
                field: name.to_string(),
            })
    }

    /// Set a field's effective value.
    ///
    /// The new value must be kind-compatible with the field's declared
    /// constant; a mismatch means the rule's override expression and the
    /// target field disagree, which is fatal for the build.
    pub fn set_field(
        &mut self,
        handle: TypeHandle,
        name: &str,
        value: DeclaredValue,
    ) -> Result<()> {
        let type_name = self.type_def(handle).type_name.clone();
        let def = &mut self.types[handle.as_u32() as usize];
        let field = def
            .field_mut(name)
            .ok_or_else(|| SubstError::FieldNotFound {
                type_name: type_name.clone(),
                field: name.to_string(),
            })?;
        let declared = field.declared.kind();
        let found = value.kind();
        if declared != found && declared != "null" && found != "null" {
            return Err(SubstError::ValueKindMismatch {
                type_name,
                field: name.to_string(),
                declared,
                found,
            });
        }
        field.value = value;
        Ok(())
    }

    /// Replace a method's body behind its stable signature.
    pub fn replace_method_body(
        &mut self,
        handle: TypeHandle,
        sig: &MethodSig,
        implementation: Implementation,
    ) -> Result<()> {
        let type_name = self.type_def(handle).type_name.clone();
        let def = &mut self.types[handle.as_u32() as usize];
        let method = def
            .method_mut(sig)
            .ok_or_else(|| SubstError::MethodNotFound {
                type_name,
                signature: sig.to_string(),
            })?;
        method.implementation = implementation;
        Ok(())
    }

    /// The ordered type table.
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    /// Number of types in the model.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the model holds no types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
