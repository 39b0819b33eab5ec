//! OpenAPI to collection conversion
//!
//! The result is one root folder named after the API. Operations are grouped
//! into one folder per declared tag, by their first tag only; operations that
//! match no tag folder go into a trailing "General" folder.

use std::collections::HashMap;

use serde_json::Value;

use crate::constants::{DEFAULT_API_COLLECTION_NAME, DEFAULT_CONTENT_TYPE, UNTAGGED_FOLDER_NAME};
use crate::error::FormatError;
use crate::models::{Folder, HttpMethod, Node, RequestNode};
use crate::openapi::document::{OpenApiDocument, Operation, Tag};
use crate::openapi::schema::{synthesize_value, SchemaRegistry};

/// Parse raw JSON text and convert it into a forest
pub fn import_openapi(raw: &str) -> Result<Vec<Node>, FormatError> {
    let doc = OpenApiDocument::parse(raw)?;
    Ok(convert_openapi(&doc))
}

/// Convert an already parsed JSON value into a forest
pub fn import_openapi_value(value: Value) -> Result<Vec<Node>, FormatError> {
    let doc = OpenApiDocument::from_json(value)?;
    Ok(convert_openapi(&doc))
}

/// Convert a validated document into a single-root forest
pub fn convert_openapi(doc: &OpenApiDocument) -> Vec<Node> {
    let base_url = doc.base_url();
    let registry = SchemaRegistry::from_components(&doc.components.schemas);

    let title = doc
        .info
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_API_COLLECTION_NAME);
    let mut root = Folder::new(title)
        .expanded(true)
        .with_description(doc.info.description.clone());

    // Tag folders in declaration order; a repeated tag name routes to the last one
    let tags: Vec<&Tag> = doc.tags.iter().filter(|tag| !tag.name.is_empty()).collect();
    let mut tag_folders: Vec<Folder> = tags
        .iter()
        .map(|tag| Folder::new(tag.name.as_str()).with_description(tag.description.clone()))
        .collect();
    let tag_index: HashMap<&str, usize> = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| (tag.name.as_str(), i))
        .collect();
    let mut untagged: Vec<Node> = Vec::new();
    let mut operations = 0usize;

    for (path, item) in &doc.paths {
        let Some(item) = item.as_object() else {
            tracing::warn!(path = %path, "Skipping path item that is not an object");
            continue;
        };

        for (verb, operation) in item {
            // Skip non-HTTP method keys like "parameters"
            let Some(method) = HttpMethod::from_openapi_verb(verb) else {
                continue;
            };
            let Some(operation) = Operation::from_value(operation) else {
                tracing::warn!(path = %path, verb = %verb, "Skipping null operation");
                continue;
            };

            let request = build_request(path, verb, method, &operation, base_url, &registry);
            operations += 1;

            let folder = operation
                .tags
                .first()
                .and_then(|tag| tag_index.get(tag.as_str()).copied());
            match folder {
                Some(i) => tag_folders[i].children.push(request.into()),
                None => untagged.push(request.into()),
            }
        }
    }

    root.children.extend(tag_folders.into_iter().map(Node::from));
    if !untagged.is_empty() {
        root.children
            .push(Folder::new(UNTAGGED_FOLDER_NAME).with_children(untagged).into());
    }

    tracing::info!(
        title = %title,
        operations,
        folders = root.children.len(),
        schemas = registry.len(),
        "Converted OpenAPI document"
    );
    vec![root.into()]
}

fn build_request(
    path: &str,
    verb: &str,
    method: HttpMethod,
    operation: &Operation,
    base_url: &str,
    registry: &SchemaRegistry,
) -> RequestNode {
    let mut request = RequestNode::new(
        operation.display_name(verb, path),
        method,
        format!("{}{}", base_url, path),
    );
    request.description = operation.description.clone();

    if let Some(body) = &operation.request_body {
        // Only the first declared media type is used
        match body.content.iter().next() {
            Some((content_type, media)) => {
                request
                    .headers
                    .insert(String::from("Content-Type"), content_type.clone());
                if let Some(schema) = media.get("schema").filter(|s| !s.is_null()) {
                    request.body = Some(synthesize_value(schema, registry));
                }
            }
            None => {
                request
                    .headers
                    .insert(String::from("Content-Type"), String::from(DEFAULT_CONTENT_TYPE));
            }
        }
    }

    request
}
