//! # Freeman Collections
//!
//! Hierarchical API request collections, as shown in Freeman's sidebar.
//!
//! ## Features
//! - Folder/request tree with add, rename, delete and reorder
//! - Single active edit (rename or new-item draft) across the tree
//! - Versioned JSON export/import of the whole forest or one collection
//! - OpenAPI import with example request bodies synthesized from schemas
//! - On-disk workspace persistence
//!
//! ## Architecture
//! Actor-based with channels:
//! - App Layer - tree store owned by a single-writer actor
//! - Import/Export - pure conversions between text and forests
//! - Storage - file access behind a narrow trait

pub mod app;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod import;
pub mod messages;
pub mod models;
pub mod openapi;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{CollectionActor, CollectionState};
pub use envelope::{clean, export_all, export_file_name, export_one, import_collection};
pub use error::{CollectionError, CollectionResult, FormatError};
pub use ids::next_id;
pub use import::{parse_import, ImportFormat, ImportedForest};
pub use messages::{ChangeEvent, CollectionCommand};
pub use models::{Container, Envelope, Folder, HttpMethod, Node, NodeKind, RequestNode};
pub use openapi::{import_openapi, synthesize, SchemaNode, SchemaRegistry};
pub use storage::{Storage, TextFiles};
