//! OpenAPI import - turns an OpenAPI document into a collection forest

pub mod document;
pub mod importer;
pub mod schema;

pub use document::{OpenApiDocument, Operation};
pub use importer::{convert_openapi, import_openapi, import_openapi_value};
pub use schema::{synthesize, synthesize_value, SchemaNode, SchemaRegistry};
