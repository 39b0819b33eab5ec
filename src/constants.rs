//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Version written into every exported collection envelope
pub const ENVELOPE_VERSION: &str = "1.0";

/// Envelope name used when the whole forest is exported
pub const EXPORT_ALL_NAME: &str = "Postman Collection Export";

/// Envelope name used for the persisted workspace file
pub const WORKSPACE_ENVELOPE_NAME: &str = "Workspace Collections";

/// File stem used when a collection name leaves nothing usable for a file name
pub const FALLBACK_FILE_STEM: &str = "collection";

/// Root folder name for an OpenAPI document without a title
pub const DEFAULT_API_COLLECTION_NAME: &str = "API Collection";

/// Folder collecting OpenAPI operations that match no tag folder
pub const UNTAGGED_FOLDER_NAME: &str = "General";

/// Name given to a freshly created top-level collection
pub const NEW_COLLECTION_NAME: &str = "New Collection";

/// Content type attached to requests created from the sidebar
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Directory under the home directory holding Freeman data
pub const CONFIG_DIR_NAME: &str = ".freeman";

/// Workspace subdirectory holding collection envelopes
pub const COLLECTIONS_DIR_NAME: &str = "collections";

/// Log file written inside the workspace directory
pub const LOG_FILE_NAME: &str = "collections.log";

/// Application name
pub const APP_NAME: &str = "Freeman Collections";
