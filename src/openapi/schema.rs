//! Example value synthesis from JSON-Schema fragments

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

use crate::models::is_truthy;

/// A schema fragment, reduced to what example synthesis looks at
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaNode {
    /// `$ref` to a named schema, holding the last path segment
    Ref(String),
    Object {
        properties: Vec<(String, SchemaNode)>,
    },
    Array {
        items: Option<Box<SchemaNode>>,
    },
    String {
        enum_values: Vec<Value>,
        format: Option<String>,
        example: Option<Value>,
        default: Option<Value>,
    },
    /// `number` or `integer`
    Number {
        example: Option<Value>,
        default: Option<Value>,
    },
    Boolean {
        example: Option<Value>,
        default: Option<Value>,
    },
    /// Missing or unrecognized `type`
    Unknown {
        example: Option<Value>,
        default: Option<Value>,
    },
}

impl SchemaNode {
    /// Classify a raw schema fragment. Never fails; anything unexpected
    /// becomes `Unknown`.
    pub fn from_value(value: &Value) -> SchemaNode {
        let Some(obj) = value.as_object() else {
            return SchemaNode::Unknown {
                example: None,
                default: None,
            };
        };

        if let Some(reference) = obj.get("$ref").and_then(|r| r.as_str()) {
            let name = reference.rsplit('/').next().unwrap_or(reference);
            return SchemaNode::Ref(name.to_string());
        }

        let example = truthy_field(obj, "example");
        let default = truthy_field(obj, "default");

        match schema_type(obj) {
            Some("object") => {
                let properties = obj
                    .get("properties")
                    .and_then(|p| p.as_object())
                    .map(|props| {
                        props
                            .iter()
                            .filter(|(_, schema)| schema.is_object())
                            .map(|(name, schema)| (name.clone(), SchemaNode::from_value(schema)))
                            .collect()
                    })
                    .unwrap_or_default();
                SchemaNode::Object { properties }
            }
            Some("array") => SchemaNode::Array {
                items: obj
                    .get("items")
                    .filter(|items| items.is_object())
                    .map(|items| Box::new(SchemaNode::from_value(items))),
            },
            Some("string") => SchemaNode::String {
                enum_values: obj
                    .get("enum")
                    .and_then(|e| e.as_array())
                    .cloned()
                    .unwrap_or_default(),
                format: obj.get("format").and_then(|f| f.as_str()).map(String::from),
                example,
                default,
            },
            Some("number") | Some("integer") => SchemaNode::Number { example, default },
            Some("boolean") => SchemaNode::Boolean { example, default },
            _ => SchemaNode::Unknown { example, default },
        }
    }
}

/// `type` may be a string or, in OpenAPI 3.1, a list such as `["string", "null"]`
fn schema_type(obj: &Map<String, Value>) -> Option<&str> {
    match obj.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(|t| t.as_str())
            .find(|t| *t != "null"),
        _ => None,
    }
}

/// `example`/`default` only count when truthy; `0`, `false` and `""` fall
/// through to the next candidate
fn truthy_field(obj: &Map<String, Value>, key: &str) -> Option<Value> {
    obj.get(key).filter(|v| is_truthy(v)).cloned()
}

/// Named schemas from `components.schemas`
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, SchemaNode>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(schemas: &Map<String, Value>) -> Self {
        SchemaRegistry {
            schemas: schemas
                .iter()
                .map(|(name, schema)| (name.clone(), SchemaNode::from_value(schema)))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: SchemaNode) {
        self.schemas.insert(name.into(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Build a representative value for `schema`.
///
/// Unresolvable references and references back into a schema that is
/// already being expanded both yield an empty object.
pub fn synthesize(schema: &SchemaNode, registry: &SchemaRegistry) -> Value {
    Synthesizer {
        registry,
        visiting: HashSet::new(),
    }
    .example_for(schema)
}

/// Convenience wrapper for raw JSON fragments
pub fn synthesize_value(schema: &Value, registry: &SchemaRegistry) -> Value {
    synthesize(&SchemaNode::from_value(schema), registry)
}

struct Synthesizer<'r> {
    registry: &'r SchemaRegistry,
    /// `$ref` names on the current expansion path
    visiting: HashSet<String>,
}

impl<'r> Synthesizer<'r> {
    fn example_for(&mut self, schema: &SchemaNode) -> Value {
        match schema {
            SchemaNode::Ref(name) => {
                let registry = self.registry;
                let Some(target) = registry.get(name) else {
                    tracing::debug!(schema = %name, "Unresolved $ref, using empty object");
                    return Value::Object(Map::new());
                };
                if !self.visiting.insert(name.clone()) {
                    tracing::debug!(schema = %name, "Cyclic $ref, using empty object");
                    return Value::Object(Map::new());
                }
                let value = self.example_for(target);
                self.visiting.remove(name);
                value
            }
            SchemaNode::Object { properties } => Value::Object(
                properties
                    .iter()
                    .map(|(name, schema)| (name.clone(), self.example_for(schema)))
                    .collect(),
            ),
            SchemaNode::Array { items } => match items {
                Some(items) => Value::Array(vec![self.example_for(items)]),
                None => Value::Array(Vec::new()),
            },
            SchemaNode::String {
                enum_values,
                format,
                example,
                default,
            } => {
                if let Some(first) = enum_values.first() {
                    return first.clone();
                }
                match format.as_deref() {
                    Some("date-time") => {
                        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
                    }
                    Some("date") => Value::String(Utc::now().format("%Y-%m-%d").to_string()),
                    Some("email") => Value::String(String::from("user@example.com")),
                    _ => fallback(example, default, Value::String(String::from("string"))),
                }
            }
            SchemaNode::Number { example, default } => fallback(example, default, Value::from(0)),
            SchemaNode::Boolean { example, default } => fallback(example, default, Value::Bool(false)),
            SchemaNode::Unknown { example, default } => fallback(example, default, Value::Null),
        }
    }
}

fn fallback(example: &Option<Value>, default: &Option<Value>, otherwise: Value) -> Value {
    example.clone().or_else(|| default.clone()).unwrap_or(otherwise)
}
