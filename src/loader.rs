//! Schema document loading
//!
//! Reads `.avsc` JSON documents from disk and parses them into the typed
//! model. A document that is missing, empty, or structurally invalid is a
//! fatal error: no partial comparison is ever attempted.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{CompatError, Result};
use crate::schema::{Field, FieldOrder, Schema, SchemaDocument, SchemaKind, TypeTable};

const PRIMITIVES: [&str; 8] = [
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

/// Load and parse a schema document from a file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<SchemaDocument> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CompatError::SchemaNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(CompatError::EmptySchema {
            path: path.to_path_buf(),
        });
    }

    parse_document(&content)
}

/// Parse a schema document from its JSON text.
pub fn parse_document(text: &str) -> Result<SchemaDocument> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CompatError::InvalidSchema(format!("{}", e)))?;

    SchemaParser::new().parse(&value)
}

/// Schema parser with named type registration.
///
/// Named types (records, enums, fixed) are collected into a [`TypeTable`]
/// as they are declared, so later references — including self-references —
/// can be resolved by name when the schemas are compared.
struct SchemaParser {
    named_types: TypeTable,
}

impl SchemaParser {
    fn new() -> Self {
        Self {
            named_types: TypeTable::new(),
        }
    }

    fn parse(mut self, value: &Value) -> Result<SchemaDocument> {
        let root = self.parse_type(value, None)?;
        Ok(SchemaDocument::new(root, self.named_types))
    }

    fn parse_type(&mut self, value: &Value, enclosing_ns: Option<&str>) -> Result<Schema> {
        match value {
            Value::String(name) => Ok(type_from_name(name, enclosing_ns)),
            Value::Array(branches) => {
                let branches = branches
                    .iter()
                    .map(|b| self.parse_type(b, enclosing_ns))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Schema {
                    name: "union".to_string(),
                    namespace: None,
                    doc: None,
                    kind: SchemaKind::Union { branches },
                })
            }
            Value::Object(obj) => {
                let type_attr = obj
                    .get("type")
                    .ok_or_else(|| CompatError::InvalidSchema("missing 'type' attribute".into()))?;

                match type_attr {
                    Value::String(tag) => match tag.as_str() {
                        "record" => self.parse_record(value, enclosing_ns),
                        "enum" => self.parse_enum(value, enclosing_ns),
                        "fixed" => self.parse_fixed(value, enclosing_ns),
                        "array" => {
                            let items = value.get("items").ok_or_else(|| {
                                CompatError::InvalidSchema("array schema missing 'items'".into())
                            })?;
                            Ok(Schema {
                                name: "array".to_string(),
                                namespace: None,
                                doc: None,
                                kind: SchemaKind::Array {
                                    items: Box::new(self.parse_type(items, enclosing_ns)?),
                                },
                            })
                        }
                        "map" => {
                            let values = value.get("values").ok_or_else(|| {
                                CompatError::InvalidSchema("map schema missing 'values'".into())
                            })?;
                            Ok(Schema {
                                name: "map".to_string(),
                                namespace: None,
                                doc: None,
                                kind: SchemaKind::Map {
                                    values: Box::new(self.parse_type(values, enclosing_ns)?),
                                },
                            })
                        }
                        // Primitive wrapped in an object, possibly annotated
                        // with a logicalType. Logical annotations are invisible
                        // to the comparison; the underlying type is what counts.
                        other => Ok(type_from_name(other, enclosing_ns)),
                    },
                    // Avro allows the 'type' attribute itself to be a nested
                    // schema or union.
                    nested => self.parse_type(nested, enclosing_ns),
                }
            }
            other => Err(CompatError::InvalidSchema(format!(
                "unexpected schema value: {}",
                other
            ))),
        }
    }

    fn parse_record(&mut self, value: &Value, enclosing_ns: Option<&str>) -> Result<Schema> {
        let name = required_name(value, "record")?;
        let namespace = declared_namespace(value, enclosing_ns);
        let doc = string_attr(value, "doc");

        let fields_json = value
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                CompatError::InvalidSchema(format!("record '{}' missing 'fields' array", name))
            })?;

        let child_ns = namespace.clone();
        let mut fields = Vec::with_capacity(fields_json.len());
        let mut seen = HashSet::new();

        for field_json in fields_json {
            let field = self.parse_field(field_json, child_ns.as_deref(), &name)?;
            if !seen.insert(field.name.clone()) {
                return Err(CompatError::DuplicateField {
                    record: name,
                    field: field.name,
                });
            }
            fields.push(field);
        }

        let schema = Schema {
            name,
            namespace,
            doc,
            kind: SchemaKind::Record { fields },
        };
        self.register(schema.clone())?;
        Ok(schema)
    }

    fn parse_field(
        &mut self,
        value: &Value,
        enclosing_ns: Option<&str>,
        record: &str,
    ) -> Result<Field> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CompatError::InvalidSchema(format!("field in record '{}' missing 'name'", record))
            })?
            .to_string();

        let type_json = value.get("type").ok_or_else(|| {
            CompatError::InvalidSchema(format!("field '{}.{}' missing 'type'", record, name))
        })?;
        let ty = self.parse_type(type_json, enclosing_ns)?;

        let order = match value.get("order").and_then(Value::as_str) {
            Some("ascending") => Some(FieldOrder::Ascending),
            Some("descending") => Some(FieldOrder::Descending),
            Some("ignore") => Some(FieldOrder::Ignore),
            _ => None,
        };

        Ok(Field {
            name,
            ty,
            default: value.get("default").cloned(),
            doc: string_attr(value, "doc"),
            order,
        })
    }

    fn parse_enum(&mut self, value: &Value, enclosing_ns: Option<&str>) -> Result<Schema> {
        let name = required_name(value, "enum")?;
        let symbols = value
            .get("symbols")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                CompatError::InvalidSchema(format!("enum '{}' missing 'symbols'", name))
            })?
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect();

        let schema = Schema {
            name,
            namespace: declared_namespace(value, enclosing_ns),
            doc: string_attr(value, "doc"),
            kind: SchemaKind::Enum { symbols },
        };
        self.register(schema.clone())?;
        Ok(schema)
    }

    fn parse_fixed(&mut self, value: &Value, enclosing_ns: Option<&str>) -> Result<Schema> {
        let name = required_name(value, "fixed")?;
        let size = value.get("size").and_then(Value::as_u64).ok_or_else(|| {
            CompatError::InvalidSchema(format!("fixed '{}' missing 'size'", name))
        })?;

        let schema = Schema {
            name,
            namespace: declared_namespace(value, enclosing_ns),
            doc: string_attr(value, "doc"),
            kind: SchemaKind::Fixed { size },
        };
        self.register(schema.clone())?;
        Ok(schema)
    }

    fn register(&mut self, schema: Schema) -> Result<()> {
        let fullname = schema.fullname();
        if self.named_types.contains(&fullname) {
            return Err(CompatError::DuplicateNamedType(fullname));
        }
        self.named_types.insert(fullname, schema);
        Ok(())
    }
}

/// Build a schema from a bare type name: a primitive token, or a reference
/// to a named type. Unqualified references inherit the enclosing namespace.
fn type_from_name(name: &str, enclosing_ns: Option<&str>) -> Schema {
    if PRIMITIVES.contains(&name) {
        return Schema::primitive(name);
    }
    if name.contains('.') {
        return Schema::reference(name);
    }
    Schema {
        name: name.to_string(),
        namespace: enclosing_ns.map(String::from),
        doc: None,
        kind: SchemaKind::Reference,
    }
}

fn required_name(value: &Value, kind: &str) -> Result<String> {
    value
        .get("name")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| CompatError::InvalidSchema(format!("{} schema missing 'name'", kind)))
}

fn declared_namespace(value: &Value, enclosing_ns: Option<&str>) -> Option<String> {
    string_attr(value, "namespace").or_else(|| enclosing_ns.map(String::from))
}

fn string_attr(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}
