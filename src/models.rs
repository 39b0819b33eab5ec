use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_CONTENT_TYPE, ENVELOPE_VERSION};
use crate::ids::next_id;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
        }
    }

    pub fn next(&self) -> HttpMethod {
        match self {
            HttpMethod::GET => HttpMethod::POST,
            HttpMethod::POST => HttpMethod::PUT,
            HttpMethod::PUT => HttpMethod::DELETE,
            HttpMethod::DELETE => HttpMethod::GET,
        }
    }

    /// Map an OpenAPI operation key onto the supported methods.
    ///
    /// PATCH collapses to PUT, OPTIONS and HEAD to GET. Keys that are not
    /// HTTP verbs (`parameters`, `summary`, ...) return `None`.
    pub fn from_openapi_verb(verb: &str) -> Option<HttpMethod> {
        match verb.to_lowercase().as_str() {
            "get" | "options" | "head" => Some(HttpMethod::GET),
            "post" => Some(HttpMethod::POST),
            "put" | "patch" => Some(HttpMethod::PUT),
            "delete" => Some(HttpMethod::DELETE),
            _ => None,
        }
    }

    /// Parse a method name as typed by a user (case-insensitive)
    pub fn parse(s: &str) -> Option<HttpMethod> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            _ => None,
        }
    }
}

/// Discriminant of a [`Node`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Request,
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Request => "request",
        }
    }

    /// Name substituted when a node would otherwise be left unnamed
    pub fn unnamed(&self) -> String {
        format!("Unnamed {}", self.as_str())
    }
}

/// A folder of nested nodes. Child order is display and export order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Folder {
            id: next_id(),
            name: name.into(),
            children: Vec::new(),
            expanded: false,
            description: None,
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// A single HTTP request definition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RequestNode {
    pub fn new(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        RequestNode {
            id: next_id(),
            name: name.into(),
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            description: None,
        }
    }

    /// Request as created from the sidebar: empty url, JSON content type
    pub fn blank(name: impl Into<String>, method: HttpMethod) -> Self {
        let mut request = RequestNode::new(name, method, "");
        request
            .headers
            .insert(String::from("Content-Type"), String::from(DEFAULT_CONTENT_TYPE));
        request
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A collection tree node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder(Folder),
    Request(RequestNode),
}

impl Node {
    pub fn folder(name: impl Into<String>) -> Self {
        Node::Folder(Folder::new(name))
    }

    pub fn request(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Node::Request(RequestNode::new(name, method, url))
    }

    pub fn id(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.id,
            Node::Request(request) => &request.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: String) {
        match self {
            Node::Folder(folder) => folder.id = id,
            Node::Request(request) => request.id = id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.name,
            Node::Request(request) => &request.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Node::Folder(folder) => folder.name = name,
            Node::Request(request) => request.name = name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Folder(_) => NodeKind::Folder,
            Node::Request(_) => NodeKind::Request,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Folder(folder) => &folder.children,
            Node::Request(_) => &[],
        }
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Node::count).sum::<usize>()
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Node::Folder(folder)
    }
}

impl From<RequestNode> for Node {
    fn from(request: RequestNode) -> Self {
        Node::Request(request)
    }
}

/// Where a node lives: the top-level forest or a folder's children
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    Root,
    Folder(String),
}

impl Container {
    pub fn from_parent(parent: Option<&str>) -> Self {
        match parent {
            Some(id) => Container::Folder(id.to_string()),
            None => Container::Root,
        }
    }
}

/// Versioned export/import wrapper around a forest
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: String,
    pub name: String,
    pub items: Vec<Node>,
    #[serde(rename = "exportDate")]
    pub export_date: DateTime<Utc>,
}

impl Envelope {
    pub fn new(name: impl Into<String>, items: Vec<Node>) -> Self {
        Envelope {
            version: ENVELOPE_VERSION.to_string(),
            name: name.into(),
            items,
            export_date: Utc::now(),
        }
    }
}

/// Pending child being typed into a folder
#[derive(Clone, Debug, PartialEq)]
pub struct NewItemDraft {
    pub kind: NodeKind,
    pub name: String,
    pub method: Option<HttpMethod>,
}

impl NewItemDraft {
    pub fn new(kind: NodeKind) -> Self {
        NewItemDraft {
            kind,
            name: String::new(),
            method: match kind {
                NodeKind::Request => Some(HttpMethod::GET),
                NodeKind::Folder => None,
            },
        }
    }
}

/// Presentation-only editing state, keyed by node id outside the tree
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiState {
    pub editing: bool,
    pub new_item: Option<NewItemDraft>,
}

impl UiState {
    pub fn is_idle(&self) -> bool {
        !self.editing && self.new_item.is_none()
    }
}

/// Loose truthiness of a JSON value, as used for optional import fields.
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy; arrays and objects are
/// always truthy, even when empty.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
