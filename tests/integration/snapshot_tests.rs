//! Model snapshot persistence tests.

use aot_subst::model::snapshot;
use aot_subst::{
    run_pass, BuildModel, DeclaredValue, Implementation, MemberSignature, MethodSig, Recompute,
    RuleRegistry, SubstitutionRule, TargetDescriptor, TypeDef,
};

fn sample_model() -> BuildModel {
    let mut model = BuildModel::new();
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
        .add_type(TypeDef::new("orm.Halflinked").with_broken_link("missing supertype"))
        .unwrap();
    model
}

#[test]
fn test_round_trip_preserves_model_and_link_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    let model = sample_model();
    snapshot::save(&model, &path).unwrap();
    let loaded = snapshot::load(&path).unwrap();

    assert_eq!(model, loaded);
    // Broken link state survives the round trip and still resists
    // resolution.
    assert!(loaded.contains_type("orm.Halflinked"));
    assert!(loaded.resolve_type("orm.Halflinked").is_none());
}

#[test]
fn test_substituted_model_round_trips() {
    let mut registry = RuleRegistry::new();
    registry
        .register(
            SubstitutionRule::new(
                "disable-runtime-codegen",
                TargetDescriptor::new("orm.ProviderRegistry")
                    .with_member(MemberSignature::field("PROVIDER_NAME_NONE")),
            )
            .alias_field("name_none", "PROVIDER_NAME_NONE")
            .override_field(
                "PROVIDER_NAME_DEFAULT",
                Recompute::FromAlias("name_none".into()),
            ),
        )
        .unwrap();

    let mut model = sample_model();
    run_pass(&registry, &mut model).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("substituted.json");
    snapshot::save(&model, &path).unwrap();
    let loaded = snapshot::load(&path).unwrap();

    // Both the effective value and the original declared constant are part
    // of the snapshot.
    let handle = loaded.resolve_type("orm.ProviderRegistry").unwrap();
    assert_eq!(
        loaded.read_field(handle, "PROVIDER_NAME_DEFAULT").unwrap(),
        &DeclaredValue::from("none")
    );
    assert_eq!(
        loaded
            .declared_field(handle, "PROVIDER_NAME_DEFAULT")
            .unwrap(),
        &DeclaredValue::from("runtime")
    );
    assert_eq!(
        snapshot::fingerprint(&model).unwrap(),
        snapshot::fingerprint(&loaded).unwrap()
    );
}

#[test]
fn test_load_missing_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = snapshot::load(dir.path().join("absent.json"));
    assert!(result.is_err());
}
