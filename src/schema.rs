//! Schema types and structures
//!
//! The typed representation of one Avro schema version. Trees are immutable
//! once loaded; everything downstream (diffing, rule evaluation) is a pure
//! function over them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of a schema, as a closed tagged variant.
///
/// A field's type in an `.avsc` document is sometimes a bare name, sometimes
/// a nested object, sometimes a list of alternatives. The loader folds all of
/// those spellings into this enum. `Reference` covers bare names that point
/// at a named type defined elsewhere in the same document; it is resolved
/// through the [`TypeTable`] when the type actually needs to be inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Primitive type; the token ("int", "string", ...) lives in `Schema::name`.
    Primitive,
    /// Enumeration with its symbol list.
    Enum { symbols: Vec<String> },
    /// Fixed-size byte array.
    Fixed { size: u64 },
    /// Array of items with a single schema.
    Array { items: Box<Schema> },
    /// Map with string keys and values of a single schema.
    Map { values: Box<Schema> },
    /// Union of alternative schemas.
    Union { branches: Vec<Schema> },
    /// Record with named fields, in declaration order.
    Record { fields: Vec<Field> },
    /// Reference to a named type; the name lives in `Schema::name`.
    Reference,
}

/// One version of a schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Name of the schema. For primitives this is the primitive token,
    /// for named types the declared name, for references the referenced name.
    pub name: String,
    /// Optional namespace (named types only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Optional documentation string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// The kind of this schema.
    pub kind: SchemaKind,
}

impl Schema {
    /// Create a primitive schema from its token.
    pub fn primitive(token: impl Into<String>) -> Self {
        Self {
            name: token.into(),
            namespace: None,
            doc: None,
            kind: SchemaKind::Primitive,
        }
    }

    /// Create a reference to a named type.
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            doc: None,
            kind: SchemaKind::Reference,
        }
    }

    /// Fully qualified name (`namespace.name` when a namespace is present).
    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }

    /// The record fields, if this is a record.
    pub fn record_fields(&self) -> Option<&[Field]> {
        match &self.kind {
            SchemaKind::Record { fields } => Some(fields),
            _ => None,
        }
    }

    /// Kind token used when reporting root-level kind changes
    /// ("record", "enum", or the primitive name itself).
    pub fn kind_name(&self) -> String {
        match &self.kind {
            SchemaKind::Primitive => self.name.clone(),
            SchemaKind::Enum { .. } => "enum".to_string(),
            SchemaKind::Fixed { .. } => "fixed".to_string(),
            SchemaKind::Array { .. } => "array".to_string(),
            SchemaKind::Map { .. } => "map".to_string(),
            SchemaKind::Union { .. } => "union".to_string(),
            SchemaKind::Record { .. } => "record".to_string(),
            SchemaKind::Reference => self.name.clone(),
        }
    }

    /// Canonical string representation used for structural equality on
    /// non-record kinds. Two types are considered equal iff their signatures
    /// match. Records are opaque here (`record:Name`); the differ recurses
    /// into them instead of comparing signatures.
    pub fn type_signature(&self) -> String {
        match &self.kind {
            SchemaKind::Primitive => self.name.clone(),
            SchemaKind::Reference => self.fullname(),
            SchemaKind::Enum { symbols } => {
                format!("enum:{}({})", self.fullname(), symbols.join(","))
            }
            SchemaKind::Fixed { size } => format!("fixed:{}[{}]", self.fullname(), size),
            SchemaKind::Array { items } => format!("array<{}>", items.type_signature()),
            SchemaKind::Map { values } => format!("map<{}>", values.type_signature()),
            SchemaKind::Union { branches } => {
                let parts: Vec<String> = branches.iter().map(|b| b.type_signature()).collect();
                format!("union<{}>", parts.join("|"))
            }
            SchemaKind::Record { .. } => format!("record:{}", self.fullname()),
        }
    }
}

/// Sort order of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrder {
    Ascending,
    Descending,
    Ignore,
}

/// A named, typed member of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within the parent record.
    pub name: String,
    /// The field's type, possibly a nested record.
    pub ty: Schema,
    /// Default value, if one was declared. A literal `"default": null` in
    /// the document is `Some(Value::Null)`, not `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Optional documentation string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Optional sort order. Meaningful for encoding, ignored for comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<FieldOrder>,
}

impl Field {
    /// Create a field with no default and no metadata.
    pub fn new(name: impl Into<String>, ty: Schema) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            doc: None,
            order: None,
        }
    }

    /// Create a field carrying a default value.
    pub fn with_default(name: impl Into<String>, ty: Schema, default: Value) -> Self {
        Self {
            name: name.into(),
            ty,
            default: Some(default),
            doc: None,
            order: None,
        }
    }

    /// A field is mandatory iff it has no default: absent values cannot be
    /// synthesized during decode.
    pub fn is_mandatory(&self) -> bool {
        self.default.is_none()
    }
}

/// Named types (records, enums, fixed) declared in a document, keyed by
/// fully qualified name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeTable {
    types: HashMap<String, Schema>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named type. Returns the previous definition if the name
    /// was already taken.
    pub fn insert(&mut self, fullname: String, schema: Schema) -> Option<Schema> {
        self.types.insert(fullname, schema)
    }

    pub fn get(&self, fullname: &str) -> Option<&Schema> {
        self.types.get(fullname)
    }

    pub fn contains(&self, fullname: &str) -> bool {
        self.types.contains_key(fullname)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Follow a reference to its definition. Unresolvable references come
    /// back unchanged and compare by name.
    pub fn resolve<'a>(&'a self, schema: &'a Schema) -> &'a Schema {
        match schema.kind {
            SchemaKind::Reference => self.get(&schema.fullname()).unwrap_or(schema),
            _ => schema,
        }
    }
}

/// One parsed schema document: the root schema plus the table of named types
/// declared anywhere inside it. The table is what lets the differ treat
/// self-referential records as a graph instead of an infinite tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// The root schema described by the document.
    pub root: Schema,
    /// All named types declared in the document.
    pub types: TypeTable,
}

impl SchemaDocument {
    pub fn new(root: Schema, types: TypeTable) -> Self {
        Self { root, types }
    }
}
