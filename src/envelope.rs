//! Collection envelope export/import
//!
//! An envelope is `{ version, name, items, exportDate }` around a forest. It
//! only exists while a forest crosses the file boundary.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

use crate::constants::{EXPORT_ALL_NAME, FALLBACK_FILE_STEM, WORKSPACE_ENVELOPE_NAME};
use crate::error::FormatError;
use crate::models::{is_truthy, Envelope, Folder, Node, RequestNode};

/// Copy of `node` holding only persisted fields that are actually set
pub fn clean(node: &Node) -> Node {
    match node {
        Node::Request(request) => Node::Request(RequestNode {
            id: request.id.clone(),
            name: request.name.clone(),
            method: request.method,
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone().filter(|body| !body.is_null()),
            description: non_empty(&request.description),
        }),
        Node::Folder(folder) => Node::Folder(Folder {
            id: folder.id.clone(),
            name: folder.name.clone(),
            children: clean_all(&folder.children),
            expanded: folder.expanded,
            description: non_empty(&folder.description),
        }),
    }
}

pub fn clean_all(nodes: &[Node]) -> Vec<Node> {
    nodes.iter().map(clean).collect()
}

fn non_empty(text: &Option<String>) -> Option<String> {
    text.as_deref().filter(|t| !t.is_empty()).map(String::from)
}

/// Envelope around the whole forest
pub fn export_all(forest: &[Node]) -> Envelope {
    Envelope::new(EXPORT_ALL_NAME, clean_all(forest))
}

/// Envelope around a single top-level folder.
///
/// Returns `None` for requests and for folders nested inside another folder.
pub fn export_one(forest: &[Node], id: &str) -> Option<Envelope> {
    let node = forest.iter().find(|node| node.id() == id)?;
    match node {
        Node::Folder(folder) => Some(Envelope::new(folder.name.clone(), vec![clean(node)])),
        Node::Request(_) => None,
    }
}

/// Envelope used for the persisted workspace file
pub fn export_workspace(forest: &[Node]) -> Envelope {
    Envelope::new(WORKSPACE_ENVELOPE_NAME, clean_all(forest))
}

/// Pretty JSON text of an envelope, two-space indented
pub fn to_json(envelope: &Envelope) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(envelope)
}

/// File name for an exported collection: lower-cased, whitespace runs
/// replaced with hyphens, `.json` suffix.
///
/// Path separators and other characters that are not valid in a file name
/// become hyphens too, and leading dots are dropped, so the result is always
/// a single component inside the target directory.
pub fn export_file_name(name: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    let unsafe_chars = UNSAFE.get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]+"#).unwrap());

    let lowered = name.to_lowercase();
    let slug = whitespace.replace_all(&lowered, "-");
    let slug = unsafe_chars.replace_all(&slug, "-");
    let slug = slug.trim_start_matches('.');
    let stem = if slug.is_empty() { FALLBACK_FILE_STEM } else { slug };
    format!("{}.json", stem)
}

/// Parse exported JSON text back into a forest.
///
/// Nothing is merged here; the caller applies the forest only once this
/// returns `Ok`.
pub fn import_collection(raw: &str) -> Result<Vec<Node>, FormatError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| FormatError::Json(e.to_string()))?;
    import_collection_value(value)
}

/// Validate an already parsed envelope and extract its items
pub fn import_collection_value(value: Value) -> Result<Vec<Node>, FormatError> {
    let Value::Object(mut obj) = value else {
        return Err(FormatError::CollectionEnvelope(String::from("not an object")));
    };

    for key in ["version", "name"] {
        if !obj.get(key).is_some_and(is_truthy) {
            return Err(FormatError::CollectionEnvelope(format!("missing '{}'", key)));
        }
    }

    let items = match obj.remove("items") {
        Some(items @ Value::Array(_)) => items,
        _ => return Err(FormatError::CollectionEnvelope(String::from("'items' is not an array"))),
    };

    Vec::<Node>::deserialize(items)
        .map_err(|e| FormatError::CollectionEnvelope(format!("invalid items: {}", e)))
}
