//! Build-time conditional substitution for closed-world (AOT) builds.
//!
//! When an application is compiled ahead of time, reachability analysis
//! closes over everything the program's types can touch, including the
//! dynamic-code-generation machinery of optional dependencies that a
//! closed world can never use. This crate detects, at build time, whether
//! an optional dependency exposes a specific set of members on a named
//! type, and if so rewrites a designated subset of that type's static
//! fields and method bodies with statically-analyzable fallbacks *before*
//! reachability runs, so the unwanted paths drop out of the final image.
//!
//! # Components
//!
//! - [`model`] - The build's in-memory model of classpath types and its
//!   mutation API
//! - [`probe`] - Total (non-failing) presence checks for optional types
//!   and members
//! - [`rule`] - Declarative substitution rules (field aliasing, recompute
//!   overrides, method replacement) and their build-scoped registry
//! - [`pipeline`] - The once-per-build substitution pass with per-rule
//!   reporting
//! - [`reach`] - The downstream closed-world reachability walk
//!
//! # Example
//!
//! ```ignore
//! use aot_subst::{
//!     run_pass, DeclaredValue, Implementation, MemberSignature, MethodSig,
//!     Recompute, RuleRegistry, SubstitutionRule, TargetDescriptor,
//! };
//!
//! let mut registry = RuleRegistry::new();
//! registry.register(
//!     SubstitutionRule::new(
//!         "disable-runtime-codegen",
//!         TargetDescriptor::new("orm.ProviderRegistry")
//!             .with_member(MemberSignature::field("PROVIDER_NAME_NONE"))
//!             .with_member(MemberSignature::method("build_provider", ["java.lang.String"])),
//!     )
//!     .alias_field("name_none", "PROVIDER_NAME_NONE")
//!     .override_field("PROVIDER_NAME_DEFAULT", Recompute::FromAlias("name_none".into()))
//!     .replace_method(
//!         MethodSig::new("build_provider", ["java.lang.String"]),
//!         Implementation::constant(DeclaredValue::Instance("orm.bytecode.NoopProvider".into())),
//!     ),
//! )?;
//!
//! // model comes from the host build tool
//! let report = run_pass(&registry, &mut model)?;
//! assert_eq!(report.applied(), 1);
//! ```

pub mod error;
pub mod model;
pub mod pipeline;
pub mod probe;
pub mod reach;
pub mod rule;

pub use error::{Result, SubstError};
pub use model::{
    BuildModel, DeclaredValue, FieldDef, Implementation, LinkState, MethodDef, MethodSig, TypeDef,
    TypeHandle,
};
pub use pipeline::{run_pass, run_pass_with_config, PassConfig, PassReport, RuleReport};
pub use probe::{probe, MemberKind, MemberSignature, TargetDescriptor};
pub use reach::{analyze_reachability, ReachabilityReport};
pub use rule::registry::RuleRegistry;
pub use rule::{
    FieldAlias, FieldOverride, MethodReplacement, Recompute, RuleOutcome, SubstitutionRule,
};
