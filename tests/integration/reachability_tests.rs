//! Reachability pruning tests.
//!
//! Verifies the end goal of the substitution pass: after rules run, the
//! closed-world walk no longer reaches the dynamic-code-generation path of
//! the optional dependency.

use aot_subst::{
    analyze_reachability, run_pass, BuildModel, DeclaredValue, Implementation, MemberSignature,
    MethodSig, Recompute, RuleRegistry, SubstitutionRule, TargetDescriptor, TypeDef,
};

/// An application whose entry point uses the ORM provider registry, whose
/// original `build_provider` body pulls in the runtime code generator.
fn application_model() -> BuildModel {
    let mut model = BuildModel::new();
    model
        .add_type(TypeDef::new("app.Main").with_method(
            MethodSig::nullary("main"),
            Implementation::opaque(["orm.ProviderRegistry"]),
        ))
        .unwrap();
    model
        .add_type(
            TypeDef::new("orm.ProviderRegistry")
                .with_field("PROVIDER_NAME_NONE", DeclaredValue::from("none"))
                .with_field("PROVIDER_NAME_DEFAULT", DeclaredValue::from("runtime"))
                .with_method(
                    MethodSig::new("build_provider", ["java.lang.String"]),
                    Implementation::opaque(["orm.bytecode.RuntimeCodegenProvider"]),
                ),
        )
        .unwrap();
    model
        .add_type(
            TypeDef::new("orm.bytecode.RuntimeCodegenProvider").with_method(
                MethodSig::nullary("generate"),
                Implementation::opaque(["orm.bytecode.ClassEmitter"]),
            ),
        )
        .unwrap();
    model
        .add_type(TypeDef::new("orm.bytecode.ClassEmitter"))
        .unwrap();
    model
        .add_type(TypeDef::new("orm.bytecode.NoopProvider"))
        .unwrap();
    model
}

fn disable_codegen_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry
        .register(
            SubstitutionRule::new(
                "disable-runtime-codegen",
                TargetDescriptor::new("orm.ProviderRegistry")
                    .with_member(MemberSignature::method(
                        "build_provider",
                        ["java.lang.String"],
                    ))
                    .with_member(MemberSignature::field("PROVIDER_NAME_NONE"))
                    .with_member(MemberSignature::field("PROVIDER_NAME_DEFAULT")),
            )
            .alias_field("name_none", "PROVIDER_NAME_NONE")
            .override_field(
                "PROVIDER_NAME_DEFAULT",
                Recompute::FromAlias("name_none".into()),
            )
            .replace_method(
                MethodSig::new("build_provider", ["java.lang.String"]),
                Implementation::constant(DeclaredValue::Instance(
                    "orm.bytecode.NoopProvider".to_string(),
                )),
            ),
        )
        .unwrap();
    registry
}

#[test]
fn test_codegen_path_reachable_without_substitution() {
    let model = application_model();
    let report = analyze_reachability(&model, &["app.Main"]);

    assert!(report.is_reachable("orm.bytecode.RuntimeCodegenProvider"));
    assert!(report.is_reachable("orm.bytecode.ClassEmitter"));
}

#[test]
fn test_codegen_path_pruned_after_substitution() {
    let mut model = application_model();
    run_pass(&disable_codegen_registry(), &mut model).unwrap();

    let report = analyze_reachability(&model, &["app.Main"]);

    // The fallback is reachable in place of the generator chain.
    assert!(report.is_reachable("orm.bytecode.NoopProvider"));
    assert!(!report.is_reachable("orm.bytecode.RuntimeCodegenProvider"));
    assert!(!report.is_reachable("orm.bytecode.ClassEmitter"));

    let pruned = report.pruned(&model);
    assert!(pruned.contains(&"orm.bytecode.RuntimeCodegenProvider"));
    assert!(pruned.contains(&"orm.bytecode.ClassEmitter"));
}

#[test]
fn test_skipped_rule_changes_nothing_downstream() {
    // Remove the optional dependency entirely; the pass skips, and the
    // walk sees exactly what an unsubstituted build would see.
    let mut model = BuildModel::new();
    model
        .add_type(TypeDef::new("app.Main").with_method(
            MethodSig::nullary("main"),
            Implementation::opaque(Vec::<String>::new()),
        ))
        .unwrap();

    run_pass(&disable_codegen_registry(), &mut model).unwrap();
    let report = analyze_reachability(&model, &["app.Main"]);

    assert!(report.is_reachable("app.Main"));
    assert_eq!(report.reachable().len(), 1);
}
