//! Import format detection
//!
//! Raw text is parsed once; documents carrying an `openapi` key go through
//! the OpenAPI importer, everything else is treated as a collection envelope.

use serde_json::Value;

use crate::envelope::import_collection_value;
use crate::error::FormatError;
use crate::models::Node;
use crate::openapi::import_openapi_value;

/// Which pipeline produced an imported forest
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportFormat {
    Collection,
    OpenApi,
}

impl ImportFormat {
    pub fn as_str(&self) -> &str {
        match self {
            ImportFormat::Collection => "collection",
            ImportFormat::OpenApi => "OpenAPI",
        }
    }
}

/// A fully parsed and validated import, ready to be merged
#[derive(Clone, Debug)]
pub struct ImportedForest {
    pub format: ImportFormat,
    pub nodes: Vec<Node>,
}

/// Parse import text of either supported format
pub fn parse_import(raw: &str) -> Result<ImportedForest, FormatError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| FormatError::Json(e.to_string()))?;

    let format = if value.get("openapi").is_some() {
        ImportFormat::OpenApi
    } else {
        ImportFormat::Collection
    };

    let nodes = match format {
        ImportFormat::OpenApi => import_openapi_value(value)?,
        ImportFormat::Collection => import_collection_value(value)?,
    };

    tracing::info!(format = format.as_str(), collections = nodes.len(), "Parsed import");
    Ok(ImportedForest { format, nodes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_openapi() {
        let imported = parse_import(
            r#"{ "openapi": "3.0.0", "info": { "title": "Pets" }, "paths": { "/pets": { "get": {} } } }"#,
        )
        .unwrap();
        assert_eq!(imported.format, ImportFormat::OpenApi);
        assert_eq!(imported.nodes[0].name(), "Pets");
    }

    #[test]
    fn test_detects_collection() {
        let imported = parse_import(
            r#"{ "version": "1.0", "name": "Mine", "items": [{ "id": "a", "type": "folder", "name": "A" }] }"#,
        )
        .unwrap();
        assert_eq!(imported.format, ImportFormat::Collection);
        assert_eq!(imported.nodes.len(), 1);
    }

    #[test]
    fn test_errors_keep_their_kind() {
        assert!(matches!(parse_import("{]"), Err(FormatError::Json(_))));
        assert!(matches!(
            parse_import(r#"{ "openapi": "3.0.0" }"#),
            Err(FormatError::OpenApiEnvelope(_))
        ));
        assert!(matches!(
            parse_import(r#"{ "name": "x" }"#),
            Err(FormatError::CollectionEnvelope(_))
        ));
    }
}
