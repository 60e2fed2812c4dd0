//! Central error types for the substitution engine.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic
//! `Display` and `From` implementations.
//!
//! Presence-probe failures never appear here: a probe folds every failure
//! mode (absent type, broken link, missing member) into a plain `false`.
//! The variants below cover what remains fatal for a build: model mutations
//! that contradict a rule's own declarations, conflicting registrations,
//! and snapshot I/O.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum SubstError {
    /// Target type is not resolvable in the build model
    #[error("type not found in build model: {0}")]
    TypeNotFound(String),

    /// A type with this qualified name is already registered in the model
    #[error("type already present in build model: {0}")]
    DuplicateType(String),

    /// Field named by a rule does not exist on the target type
    #[error("no field `{field}` on type {type_name}")]
    FieldNotFound { type_name: String, field: String },

    /// Method named by a rule does not exist on the target type
    #[error("no method `{signature}` on type {type_name}")]
    MethodNotFound {
        type_name: String,
        signature: String,
    },

    /// Overriding value is incompatible with the field's declared value kind
    #[error(
        "cannot override field `{field}` on {type_name}: declared as {declared}, got {found}"
    )]
    ValueKindMismatch {
        type_name: String,
        field: String,
        declared: &'static str,
        found: &'static str,
    },

    /// A recompute expression referenced an alias the rule never bound
    #[error("no alias `{0}` bound in this rule")]
    AliasNotBound(String),

    /// Two registered rules target the same type
    #[error("rules `{first}` and `{second}` both target type {type_name}")]
    OverlappingRules {
        type_name: String,
        first: String,
        second: String,
    },

    /// A rule passed its presence probe but could not be applied.
    ///
    /// This indicates an inconsistency between the rule's declared member
    /// signatures and the actual target shape, which is a defect in the
    /// rule's declaration rather than an environment condition.
    #[error("rule `{rule}` failed to apply: {source}")]
    RuleApplication {
        rule: String,
        #[source]
        source: Box<SubstError>,
    },

    /// IO operation failed (snapshot read/write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using SubstError.
pub type Result<T> = std::result::Result<T, SubstError>;
