//! End-to-end compatibility scenarios over schema files
//!
//! Each test loads two fixture documents, runs the full pipeline (load →
//! diff → evaluate → aggregate) and checks the verdict and its exit
//! semantics.

use std::path::PathBuf;

use schema_compat::{
    load_schema, CheckReport, CompatibilityChecker, CompatibilityMode, ModificationKind,
    SchemaDocument,
};

fn fixture(name: &str) -> SchemaDocument {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    load_schema(&path).unwrap_or_else(|e| panic!("failed to load {}: {}", name, e))
}

fn check(old: &str, new: &str, mode: CompatibilityMode) -> CheckReport {
    CompatibilityChecker::new(mode).check(&fixture(old), &fixture(new))
}

#[test]
fn identical_schemas_pass_under_every_mode() {
    for mode in [
        CompatibilityMode::Backward,
        CompatibilityMode::Forward,
        CompatibilityMode::Full,
        CompatibilityMode::None,
        CompatibilityMode::Unknown,
    ] {
        let report = check("order_nested_v1.avsc", "order_nested_v1.avsc", mode);
        assert!(report.changes.is_empty(), "diff not empty under {}", mode);
        assert!(report.metadata.is_empty());
        assert!(report.verdict.ok);
        assert_eq!(report.verdict.exit_code(), 0);
    }
}

#[test]
fn mandatory_addition_fails_backward() {
    let report = check(
        "store_orders_v1.avsc",
        "store_orders_v2_mandatory_age.avsc",
        CompatibilityMode::Backward,
    );

    assert!(!report.verdict.ok);
    assert_eq!(report.verdict.exit_code(), 1);
    assert_eq!(report.verdict.errors.len(), 1);
    assert!(report.verdict.errors[0].contains("age"));
    assert!(report
        .verdict
        .suggestions
        .iter()
        .any(|s| s.contains("FORWARD")));
}

#[test]
fn optional_addition_passes_backward() {
    let report = check(
        "store_orders_v1.avsc",
        "store_orders_v2_optional_age.avsc",
        CompatibilityMode::Backward,
    );

    assert!(report.verdict.ok);
    assert_eq!(report.verdict.exit_code(), 0);
    assert!(report.verdict.errors.is_empty());
}

#[test]
fn mandatory_removal_fails_forward_but_passes_backward() {
    let report = check(
        "store_orders_v1_legacy.avsc",
        "store_orders_v1.avsc",
        CompatibilityMode::Forward,
    );
    assert!(!report.verdict.ok);
    assert_eq!(report.verdict.errors.len(), 1);
    assert!(report.verdict.errors[0].contains("legacy"));
    assert!(report
        .verdict
        .suggestions
        .iter()
        .any(|s| s.contains("BACKWARD")));

    let report = check(
        "store_orders_v1_legacy.avsc",
        "store_orders_v1.avsc",
        CompatibilityMode::Backward,
    );
    assert!(report.verdict.ok);
}

#[test]
fn nested_type_change_is_reported_but_never_blocks() {
    for mode in [
        CompatibilityMode::Backward,
        CompatibilityMode::Forward,
        CompatibilityMode::Full,
        CompatibilityMode::None,
    ] {
        let report = check(
            "order_nested_v1.avsc",
            "order_nested_v2_zip_int.avsc",
            mode,
        );

        assert_eq!(report.changes.modified.len(), 1);
        let modification = &report.changes.modified[0];
        assert_eq!(modification.path, "address.zip");
        assert_eq!(
            modification.kind,
            ModificationKind::TypeChanged {
                old: "string".to_string(),
                new: "int".to_string(),
            }
        );

        assert!(report.verdict.ok, "type change alone must pass under {}", mode);
        assert!(report.verdict.notes[0].contains("address.zip"));
    }
}

#[test]
fn unknown_mode_is_conservative() {
    let mode = CompatibilityMode::parse("whatever-the-registry-said");
    assert_eq!(mode, CompatibilityMode::Unknown);

    // Mandatory addition fails...
    let report = check(
        "store_orders_v1.avsc",
        "store_orders_v2_mandatory_age.avsc",
        mode,
    );
    assert!(!report.verdict.ok);

    // ...mandatory removal fails...
    let report = check("store_orders_v1_legacy.avsc", "store_orders_v1.avsc", mode);
    assert!(!report.verdict.ok);

    // ...optional-only changes pass.
    let report = check(
        "store_orders_v1.avsc",
        "store_orders_v2_optional_age.avsc",
        mode,
    );
    assert!(report.verdict.ok);
    assert!(report
        .verdict
        .warnings
        .iter()
        .any(|w| w.contains("not recognized")));
}

#[test]
fn self_referential_schema_terminates_and_diffs() {
    // Self-diff terminates with no changes
    let report = check(
        "linked_node_v1.avsc",
        "linked_node_v1.avsc",
        CompatibilityMode::Full,
    );
    assert!(report.changes.is_empty());
    assert!(report.verdict.ok);

    // Adding an optional field is seen at the top level and through the
    // single guarded recursion into the self-reference
    let report = check(
        "linked_node_v1.avsc",
        "linked_node_v2_weight.avsc",
        CompatibilityMode::Full,
    );
    assert_eq!(
        report.changes.added_optional,
        vec!["next.weight".to_string(), "weight".to_string()]
    );
    assert!(report.verdict.ok);
}

#[test]
fn full_mode_rejects_both_mandatory_directions() {
    let report = check(
        "store_orders_v1_legacy.avsc",
        "store_orders_v2_mandatory_age.avsc",
        CompatibilityMode::Full,
    );

    assert!(!report.verdict.ok);
    assert_eq!(report.verdict.errors.len(), 2);
    assert!(report.verdict.errors.iter().any(|e| e.contains("age")));
    assert!(report.verdict.errors.iter().any(|e| e.contains("legacy")));
}

#[test]
fn none_mode_checks_nothing_field_related() {
    let report = check(
        "store_orders_v1_legacy.avsc",
        "store_orders_v2_mandatory_age.avsc",
        CompatibilityMode::None,
    );

    assert!(report.verdict.ok);
    assert_eq!(report.verdict.exit_code(), 0);
}

#[test]
fn diff_direction_is_antisymmetric_over_files() {
    let old = fixture("store_orders_v1_legacy.avsc");
    let new = fixture("store_orders_v2_mandatory_age.avsc");
    let checker = CompatibilityChecker::new(CompatibilityMode::None);

    let forward = checker.check(&old, &new);
    let backward = checker.check(&new, &old);

    assert_eq!(
        forward.changes.added_mandatory,
        backward.changes.removed_mandatory
    );
    assert_eq!(
        forward.changes.removed_mandatory,
        backward.changes.added_mandatory
    );
    assert_eq!(
        forward.changes.added_optional,
        backward.changes.removed_optional
    );
    assert_eq!(
        forward.changes.removed_optional,
        backward.changes.added_optional
    );
}
