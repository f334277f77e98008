//! Recursive field diffing
//!
//! Compares two field collections level by level, classifying every change
//! along two axes: added/removed/modified, and mandatory/optional. Field
//! names are the join key; declaration order is never compared. Nested
//! records are compared through the documents' type tables, with a visited
//! set of record-name pairs so self-referential schemas terminate.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Field, SchemaDocument, SchemaKind, TypeTable};

/// A modification to a field present in both schema versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    /// Dotted path of the field (e.g. "address.zip").
    pub path: String,
    /// What changed.
    pub kind: ModificationKind,
}

/// What changed about a field that exists on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ModificationKind {
    /// The field's type signature differs.
    TypeChanged { old: String, new: String },
    /// The field's default differs (present on one side only, or a
    /// different value).
    DefaultChanged {
        old: Option<Value>,
        new: Option<Value>,
    },
}

impl std::fmt::Display for Modification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ModificationKind::TypeChanged { old, new } => {
                write!(f, "{} (type changed: {} -> {})", self.path, old, new)
            }
            ModificationKind::DefaultChanged { old, new } => {
                write!(
                    f,
                    "{} (default changed: {} -> {})",
                    self.path,
                    render_default(old),
                    render_default(new)
                )
            }
        }
    }
}

fn render_default(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "<none>".to_string(),
    }
}

/// The classified result of comparing two field collections, aggregated
/// across all nesting levels. Paths are dotted and lists are sorted
/// lexically, so identical inputs produce byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Fields present only in the new schema, without a default.
    pub added_mandatory: Vec<String>,
    /// Fields present only in the new schema, with a default.
    pub added_optional: Vec<String>,
    /// Fields present only in the old schema, without a default.
    pub removed_mandatory: Vec<String>,
    /// Fields present only in the old schema, with a default.
    pub removed_optional: Vec<String>,
    /// Fields present in both schemas whose type or default changed.
    pub modified: Vec<Modification>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added_mandatory.is_empty()
            && self.added_optional.is_empty()
            && self.removed_mandatory.is_empty()
            && self.removed_optional.is_empty()
            && self.modified.is_empty()
    }

    /// Total number of classified changes.
    pub fn len(&self) -> usize {
        self.added_mandatory.len()
            + self.added_optional.len()
            + self.removed_mandatory.len()
            + self.removed_optional.len()
            + self.modified.len()
    }

    /// All added paths, mandatory and optional.
    pub fn added(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .added_mandatory
            .iter()
            .chain(&self.added_optional)
            .map(String::as_str)
            .collect();
        paths.sort_unstable();
        paths
    }

    /// All removed paths, mandatory and optional.
    pub fn removed(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .removed_mandatory
            .iter()
            .chain(&self.removed_optional)
            .map(String::as_str)
            .collect();
        paths.sort_unstable();
        paths
    }

    fn record_added(&mut self, path: String, mandatory: bool) {
        if mandatory {
            self.added_mandatory.push(path);
        } else {
            self.added_optional.push(path);
        }
    }

    fn record_removed(&mut self, path: String, mandatory: bool) {
        if mandatory {
            self.removed_mandatory.push(path);
        } else {
            self.removed_optional.push(path);
        }
    }

    fn sort(&mut self) {
        self.added_mandatory.sort_unstable();
        self.added_optional.sort_unstable();
        self.removed_mandatory.sort_unstable();
        self.removed_optional.sort_unstable();
        self.modified.sort_by(|a, b| a.path.cmp(&b.path));
    }
}

/// Recursive differ over two field collections.
///
/// Carries the type tables of both documents so named references resolve on
/// the side they came from. The differ never mutates its inputs; two
/// unrelated comparisons can run in parallel without coordination.
pub struct FieldDiffer<'a> {
    old_types: &'a TypeTable,
    new_types: &'a TypeTable,
}

impl<'a> FieldDiffer<'a> {
    pub fn new(old_types: &'a TypeTable, new_types: &'a TypeTable) -> Self {
        Self {
            old_types,
            new_types,
        }
    }

    /// Compare two field collections, recursing into nested records.
    pub fn diff(&self, old_fields: &[Field], new_fields: &[Field]) -> ChangeSet {
        let mut changes = ChangeSet::default();
        let mut visited = HashSet::new();
        self.diff_level(old_fields, new_fields, "", &mut visited, &mut changes);
        changes.sort();
        changes
    }

    fn diff_level(
        &self,
        old_fields: &[Field],
        new_fields: &[Field],
        prefix: &str,
        visited: &mut HashSet<(String, String)>,
        changes: &mut ChangeSet,
    ) {
        let old_by_name: HashMap<&str, &Field> =
            old_fields.iter().map(|f| (f.name.as_str(), f)).collect();
        let new_by_name: HashMap<&str, &Field> =
            new_fields.iter().map(|f| (f.name.as_str(), f)).collect();

        for field in new_fields {
            if !old_by_name.contains_key(field.name.as_str()) {
                changes.record_added(format!("{}{}", prefix, field.name), field.is_mandatory());
            }
        }

        for field in old_fields {
            if !new_by_name.contains_key(field.name.as_str()) {
                changes.record_removed(format!("{}{}", prefix, field.name), field.is_mandatory());
            }
        }

        for old_field in old_fields {
            let Some(new_field) = new_by_name.get(old_field.name.as_str()) else {
                continue;
            };
            let path = format!("{}{}", prefix, old_field.name);

            let old_ty = self.old_types.resolve(&old_field.ty);
            let new_ty = self.new_types.resolve(&new_field.ty);

            match (&old_ty.kind, &new_ty.kind) {
                (SchemaKind::Record { fields: old_sub }, SchemaKind::Record { fields: new_sub }) => {
                    let pair = (old_ty.fullname(), new_ty.fullname());
                    // Recurse only if this record-name pair is not already on
                    // the active path. A pair reappearing is a recursive
                    // reference: equal by name, nothing further to compare.
                    if visited.insert(pair.clone()) {
                        let child_prefix = format!("{}.", path);
                        self.diff_level(old_sub, new_sub, &child_prefix, visited, changes);
                        visited.remove(&pair);
                    }
                }
                _ => {
                    let old_sig = old_ty.type_signature();
                    let new_sig = new_ty.type_signature();
                    if old_sig != new_sig {
                        changes.modified.push(Modification {
                            path: path.clone(),
                            kind: ModificationKind::TypeChanged {
                                old: old_sig,
                                new: new_sig,
                            },
                        });
                    }
                }
            }

            if old_field.default != new_field.default {
                changes.modified.push(Modification {
                    path,
                    kind: ModificationKind::DefaultChanged {
                        old: old_field.default.clone(),
                        new: new_field.default.clone(),
                    },
                });
            }
        }
    }
}

/// Diff the root records of two documents. Non-record roots have no fields
/// to compare and yield an empty change set.
pub fn diff_documents(old: &SchemaDocument, new: &SchemaDocument) -> ChangeSet {
    match (old.root.record_fields(), new.root.record_fields()) {
        (Some(old_fields), Some(new_fields)) => {
            FieldDiffer::new(&old.types, &new.types).diff(old_fields, new_fields)
        }
        _ => ChangeSet::default(),
    }
}
