//! Read-only model of the consumed OpenAPI subset

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::FormatError;

/// An OpenAPI document, limited to what collection import needs.
///
/// `paths` keeps the raw path items so source order is preserved and
/// non-operation keys (`parameters`, `summary`, ...) can be skipped.
/// Optional sections that are `null` read as absent.
#[derive(Clone, Debug, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    #[serde(default, deserialize_with = "null_as_default")]
    pub servers: Vec<Server>,
    pub paths: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Components,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Components {
    #[serde(default, deserialize_with = "null_as_default")]
    pub schemas: Map<String, Value>,
}

/// A declared tag. Tags without a name get no folder.
#[derive(Clone, Debug, Deserialize)]
pub struct Tag {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single operation under a path item
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Operation {
    pub summary: Option<String>,
    pub operation_id: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub request_body: Option<RequestBody>,
}

impl Operation {
    /// Read an operation field by field.
    ///
    /// A field of the wrong type is treated as missing instead of failing
    /// the whole operation; any other non-object reads as an empty
    /// operation. Only `null` yields `None`.
    pub fn from_value(value: &Value) -> Option<Operation> {
        if value.is_null() {
            return None;
        }
        let Some(obj) = value.as_object() else {
            return Some(Operation::default());
        };
        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(String::from);

        Some(Operation {
            summary: text("summary"),
            operation_id: text("operationId"),
            description: text("description"),
            tags: obj
                .get("tags")
                .and_then(Value::as_array)
                // Keep positions so only a string first tag picks a folder
                .map(|tags| {
                    tags.iter()
                        .map(|tag| tag.as_str().unwrap_or_default().to_string())
                        .collect()
                })
                .unwrap_or_default(),
            request_body: obj
                .get("requestBody")
                .and_then(Value::as_object)
                .map(|body| RequestBody {
                    content: body
                        .get("content")
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default(),
                    required: body.get("required").and_then(Value::as_bool).unwrap_or(false),
                }),
        })
    }

    /// Display name: summary, then operationId, then "<VERB> <path>"
    pub fn display_name(&self, verb: &str, path: &str) -> String {
        self.summary
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.operation_id.as_deref().filter(|s| !s.is_empty()))
            .map(String::from)
            .unwrap_or_else(|| format!("{} {}", verb.to_uppercase(), path))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestBody {
    /// Media type name to media type object, in declaration order
    pub content: Map<String, Value>,
    pub required: bool,
}

impl OpenApiDocument {
    /// Parse and validate raw JSON text
    pub fn parse(raw: &str) -> Result<OpenApiDocument, FormatError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| FormatError::Json(e.to_string()))?;
        OpenApiDocument::from_json(value)
    }

    /// Validate an already parsed JSON value.
    ///
    /// `openapi`, `info` and `paths` must be present before anything else
    /// is looked at.
    pub fn from_json(value: Value) -> Result<OpenApiDocument, FormatError> {
        let Some(obj) = value.as_object() else {
            return Err(FormatError::OpenApiEnvelope(String::from("document is not an object")));
        };

        let has_version = obj
            .get("openapi")
            .and_then(|v| v.as_str())
            .is_some_and(|v| !v.is_empty());
        if !has_version {
            return Err(FormatError::OpenApiEnvelope(String::from("missing 'openapi' version")));
        }
        if !obj.get("info").is_some_and(Value::is_object) {
            return Err(FormatError::OpenApiEnvelope(String::from("missing 'info'")));
        }
        if !obj.get("paths").is_some_and(Value::is_object) {
            return Err(FormatError::OpenApiEnvelope(String::from("missing 'paths'")));
        }

        OpenApiDocument::deserialize(value).map_err(|e| FormatError::OpenApiEnvelope(e.to_string()))
    }

    /// Base URL of the first declared server, or empty
    pub fn base_url(&self) -> &str {
        self.servers.first().map(|s| s.url.as_str()).unwrap_or("")
    }
}
