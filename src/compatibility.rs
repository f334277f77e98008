//! Compatibility rule evaluation
//!
//! Turns a structural diff plus the declared compatibility mode into
//! errors, warnings, notes and suggestions. Metadata rules run first and are
//! mode-independent (except the name rule); field rules are keyed by mode and
//! evaluate against the aggregated change set — a violation at any nesting
//! depth fails the whole check.

use serde::{Deserialize, Serialize};

use crate::diff::{diff_documents, ChangeSet};
use crate::schema::{Schema, SchemaDocument};
use crate::verdict::Verdict;

/// The evolution contract between two schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompatibilityMode {
    /// New schema can read data written with the old schema.
    Backward,
    /// Old schema can read data written with the new schema.
    Forward,
    /// Both directions must hold.
    Full,
    /// No evolution rules are enforced.
    None,
    /// Unrecognized mode; the conservative rules apply.
    Unknown,
}

impl CompatibilityMode {
    /// Parse a mode string as supplied by a registry or the command line.
    ///
    /// Normalization happens here, once: trim, uppercase, and map the
    /// `*_TRANSITIVE` registry variants onto their base mode. Anything that
    /// does not match — including an empty string — is `Unknown`, never a
    /// silent pass.
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_ascii_uppercase();
        let base = normalized.strip_suffix("_TRANSITIVE").unwrap_or(&normalized);
        match base {
            "BACKWARD" => Self::Backward,
            "FORWARD" => Self::Forward,
            "FULL" => Self::Full,
            "NONE" => Self::None,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backward => "BACKWARD",
            Self::Forward => "FORWARD",
            Self::Full => "FULL",
            Self::None => "NONE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether this mode rejects adding a field without a default.
    fn forbids_mandatory_addition(&self) -> bool {
        matches!(self, Self::Backward | Self::Full | Self::Unknown)
    }

    /// Whether this mode rejects removing a field without a default.
    fn forbids_mandatory_removal(&self) -> bool {
        matches!(self, Self::Forward | Self::Full | Self::Unknown)
    }
}

impl std::fmt::Display for CompatibilityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Differences between the root schemas' metadata attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDelta {
    /// Root name change (old, new).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<(String, String)>,
    /// Root kind change (old, new) — e.g. record -> enum, or int -> string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<(String, String)>,
    /// Root namespace change (old, new).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<(Option<String>, Option<String>)>,
    /// Whether the root doc string changed. Tracked for reporting symmetry;
    /// doc changes have no compatibility impact.
    pub doc_changed: bool,
}

impl MetadataDelta {
    /// Compute the metadata delta between two root schemas.
    pub fn between(old: &Schema, new: &Schema) -> Self {
        Self {
            name: (old.name != new.name).then(|| (old.name.clone(), new.name.clone())),
            kind: (old.kind_name() != new.kind_name())
                .then(|| (old.kind_name(), new.kind_name())),
            namespace: (old.namespace != new.namespace)
                .then(|| (old.namespace.clone(), new.namespace.clone())),
            doc_changed: old.doc != new.doc,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none() && self.namespace.is_none() && !self.doc_changed
    }
}

/// Rule-engine output, not yet aggregated into a verdict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Apply the metadata and field rules for the given mode.
pub fn evaluate(
    changes: &ChangeSet,
    metadata: &MetadataDelta,
    mode: CompatibilityMode,
) -> Evaluation {
    let mut eval = Evaluation::default();

    if let Some((old, new)) = &metadata.name {
        if mode == CompatibilityMode::None {
            eval.warnings.push(format!(
                "record name changed from '{}' to '{}'; declare '{}' as an alias so existing readers still resolve it",
                old, new, old
            ));
        } else {
            eval.errors.push(format!(
                "record name changed from '{}' to '{}'; renames require NONE compatibility",
                old, new
            ));
            eval.suggestions.push(format!(
                "keep the name '{}' and declare an alias, or switch the subject to NONE",
                old
            ));
        }
    }

    if let Some((old, new)) = &metadata.kind {
        eval.errors.push(format!(
            "schema kind changed from '{}' to '{}'; no compatibility mode permits this",
            old, new
        ));
    }

    if let Some((old, new)) = &metadata.namespace {
        eval.warnings.push(format!(
            "namespace changed from {} to {}; this affects the fully qualified name (consider aliases)",
            render_namespace(old),
            render_namespace(new)
        ));
    }

    if mode == CompatibilityMode::Unknown {
        eval.warnings.push(
            "compatibility mode was not recognized; applying conservative rules \
             (mandatory additions and removals are both rejected)"
                .to_string(),
        );
    }

    if mode.forbids_mandatory_addition() && !changes.added_mandatory.is_empty() {
        eval.errors.push(format!(
            "adding mandatory fields is not allowed under {} compatibility: {}",
            mode,
            changes.added_mandatory.join(", ")
        ));
        eval.suggestions.push(
            "give the new fields default values, or switch the subject to FORWARD (or NONE), \
             which permits mandatory additions"
                .to_string(),
        );
    }

    if mode.forbids_mandatory_removal() && !changes.removed_mandatory.is_empty() {
        eval.errors.push(format!(
            "removing mandatory fields is not allowed under {} compatibility: {}",
            mode,
            changes.removed_mandatory.join(", ")
        ));
        eval.suggestions.push(
            "switch the subject to BACKWARD (or NONE), which permits mandatory removals"
                .to_string(),
        );
    }

    // Type and default modifications are never mode-gated: they surface as
    // notes so a reviewer sees them, but they cannot fail the check on
    // their own.
    for modification in &changes.modified {
        eval.notes.push(modification.to_string());
    }

    eval
}

fn render_namespace(ns: &Option<String>) -> String {
    match ns {
        Some(ns) => format!("'{}'", ns),
        None => "<none>".to_string(),
    }
}

/// The full structured result of one comparison run, stable-ordered for
/// rendering.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// The mode the check ran under.
    pub mode: CompatibilityMode,
    /// Root metadata differences.
    pub metadata: MetadataDelta,
    /// The classified field changes.
    pub changes: ChangeSet,
    /// The aggregated pass/fail verdict.
    pub verdict: Verdict,
}

/// Compatibility checker for two schema documents.
pub struct CompatibilityChecker {
    mode: CompatibilityMode,
}

impl CompatibilityChecker {
    pub fn new(mode: CompatibilityMode) -> Self {
        Self { mode }
    }

    /// Diff the documents, evaluate the rules, aggregate the verdict.
    pub fn check(&self, old: &SchemaDocument, new: &SchemaDocument) -> CheckReport {
        let metadata = MetadataDelta::between(&old.root, &new.root);
        let changes = diff_documents(old, new);
        let verdict = Verdict::from_evaluation(evaluate(&changes, &metadata, self.mode));

        CheckReport {
            mode: self.mode,
            metadata,
            changes,
            verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_document;

    fn check(old: &str, new: &str, mode: CompatibilityMode) -> CheckReport {
        let old = parse_document(old).unwrap();
        let new = parse_document(new).unwrap();
        CompatibilityChecker::new(mode).check(&old, &new)
    }

    const ORDER_V1: &str = r#"{
        "type": "record",
        "name": "Order",
        "namespace": "com.example",
        "fields": [
            {"name": "id", "type": "int"},
            {"name": "name", "type": "string"}
        ]
    }"#;

    const ORDER_ADD_MANDATORY: &str = r#"{
        "type": "record",
        "name": "Order",
        "namespace": "com.example",
        "fields": [
            {"name": "id", "type": "int"},
            {"name": "name", "type": "string"},
            {"name": "age", "type": "int"}
        ]
    }"#;

    const ORDER_ADD_OPTIONAL: &str = r#"{
        "type": "record",
        "name": "Order",
        "namespace": "com.example",
        "fields": [
            {"name": "id", "type": "int"},
            {"name": "name", "type": "string"},
            {"name": "age", "type": "int", "default": 0}
        ]
    }"#;

    #[test]
    fn test_mode_parsing_normalizes_case_and_whitespace() {
        assert_eq!(CompatibilityMode::parse("backward"), CompatibilityMode::Backward);
        assert_eq!(CompatibilityMode::parse("  Forward "), CompatibilityMode::Forward);
        assert_eq!(CompatibilityMode::parse("FULL"), CompatibilityMode::Full);
        assert_eq!(CompatibilityMode::parse("none"), CompatibilityMode::None);
    }

    #[test]
    fn test_mode_parsing_maps_transitive_variants() {
        assert_eq!(
            CompatibilityMode::parse("BACKWARD_TRANSITIVE"),
            CompatibilityMode::Backward
        );
        assert_eq!(
            CompatibilityMode::parse("full_transitive"),
            CompatibilityMode::Full
        );
    }

    #[test]
    fn test_mode_parsing_unmatched_is_unknown() {
        assert_eq!(CompatibilityMode::parse(""), CompatibilityMode::Unknown);
        assert_eq!(CompatibilityMode::parse("LENIENT"), CompatibilityMode::Unknown);
    }

    #[test]
    fn test_backward_rejects_mandatory_addition() {
        let report = check(ORDER_V1, ORDER_ADD_MANDATORY, CompatibilityMode::Backward);
        assert!(!report.verdict.ok);
        assert_eq!(report.verdict.errors.len(), 1);
        assert!(report.verdict.errors[0].contains("age"));
        assert!(!report.verdict.suggestions.is_empty());
    }

    #[test]
    fn test_backward_accepts_optional_addition() {
        let report = check(ORDER_V1, ORDER_ADD_OPTIONAL, CompatibilityMode::Backward);
        assert!(report.verdict.ok);
        assert!(report.verdict.errors.is_empty());
    }

    #[test]
    fn test_backward_accepts_any_removal() {
        let old = r#"{
            "type": "record",
            "name": "Order",
            "fields": [
                {"name": "id", "type": "int"},
                {"name": "name", "type": "string"},
                {"name": "legacy", "type": "string"}
            ]
        }"#;
        let new = r#"{
            "type": "record",
            "name": "Order",
            "fields": [
                {"name": "id", "type": "int"},
                {"name": "name", "type": "string"}
            ]
        }"#;

        assert!(check(old, new, CompatibilityMode::Backward).verdict.ok);
        // The same removal fails FORWARD
        let report = check(old, new, CompatibilityMode::Forward);
        assert!(!report.verdict.ok);
        assert!(report.verdict.errors[0].contains("legacy"));
    }

    #[test]
    fn test_forward_accepts_mandatory_addition() {
        assert!(check(ORDER_V1, ORDER_ADD_MANDATORY, CompatibilityMode::Forward).verdict.ok);
    }

    #[test]
    fn test_full_rejects_both_directions() {
        let report = check(ORDER_V1, ORDER_ADD_MANDATORY, CompatibilityMode::Full);
        assert!(!report.verdict.ok);

        let report = check(ORDER_ADD_MANDATORY, ORDER_V1, CompatibilityMode::Full);
        assert!(!report.verdict.ok);

        assert!(check(ORDER_V1, ORDER_ADD_OPTIONAL, CompatibilityMode::Full).verdict.ok);
    }

    #[test]
    fn test_none_tolerates_everything_field_related() {
        let report = check(ORDER_ADD_MANDATORY, ORDER_V1, CompatibilityMode::None);
        assert!(report.verdict.ok);
    }

    #[test]
    fn test_unknown_mode_is_conservative() {
        let report = check(ORDER_V1, ORDER_ADD_MANDATORY, CompatibilityMode::Unknown);
        assert!(!report.verdict.ok);
        assert!(report
            .verdict
            .warnings
            .iter()
            .any(|w| w.contains("not recognized")));

        // Optional-only changes still pass
        let report = check(ORDER_V1, ORDER_ADD_OPTIONAL, CompatibilityMode::Unknown);
        assert!(report.verdict.ok);
    }

    #[test]
    fn test_name_change_errors_outside_none() {
        let renamed = ORDER_V1.replace("\"Order\"", "\"Purchase\"");

        let report = check(ORDER_V1, &renamed, CompatibilityMode::Backward);
        assert!(!report.verdict.ok);
        assert!(report.verdict.errors[0].contains("name changed"));

        let report = check(ORDER_V1, &renamed, CompatibilityMode::None);
        assert!(report.verdict.ok);
        assert!(report.verdict.warnings[0].contains("alias"));
    }

    #[test]
    fn test_root_kind_change_always_errors() {
        let enum_root = r#"{
            "type": "enum",
            "name": "Order",
            "namespace": "com.example",
            "symbols": ["NEW", "SHIPPED"]
        }"#;

        for mode in [
            CompatibilityMode::Backward,
            CompatibilityMode::Forward,
            CompatibilityMode::Full,
            CompatibilityMode::None,
        ] {
            let report = check(ORDER_V1, enum_root, mode);
            assert!(!report.verdict.ok, "kind change must fail under {}", mode);
            assert!(report
                .verdict
                .errors
                .iter()
                .any(|e| e.contains("kind changed")));
        }
    }

    #[test]
    fn test_namespace_change_warns_but_passes() {
        let moved = ORDER_V1.replace("com.example", "com.example.v2");
        let report = check(ORDER_V1, &moved, CompatibilityMode::Backward);
        assert!(report.verdict.ok);
        assert!(report.verdict.warnings[0].contains("namespace"));
    }

    #[test]
    fn test_doc_change_is_ignored() {
        let old = r#"{"type": "record", "name": "Order", "doc": "v1", "fields": []}"#;
        let new = r#"{"type": "record", "name": "Order", "doc": "v2", "fields": []}"#;
        let report = check(old, new, CompatibilityMode::Full);
        assert!(report.verdict.ok);
        assert!(report.verdict.warnings.is_empty());
        assert!(report.metadata.doc_changed);
    }

    #[test]
    fn test_type_change_surfaces_as_note_only() {
        let new = ORDER_V1.replace("\"type\": \"int\"", "\"type\": \"long\"");
        let report = check(ORDER_V1, &new, CompatibilityMode::Full);
        assert!(report.verdict.ok);
        assert!(report.verdict.notes[0].contains("type changed"));
    }

    #[test]
    fn test_nested_violation_fails_whole_check() {
        let old = r#"{
            "type": "record",
            "name": "Order",
            "fields": [
                {"name": "address", "type": {
                    "type": "record",
                    "name": "Address",
                    "fields": [{"name": "zip", "type": "string"}]
                }}
            ]
        }"#;
        let new = r#"{
            "type": "record",
            "name": "Order",
            "fields": [
                {"name": "address", "type": {
                    "type": "record",
                    "name": "Address",
                    "fields": [
                        {"name": "zip", "type": "string"},
                        {"name": "country", "type": "string"}
                    ]
                }}
            ]
        }"#;

        let report = check(old, new, CompatibilityMode::Backward);
        assert!(!report.verdict.ok);
        assert!(report.verdict.errors[0].contains("address.country"));
    }
}
