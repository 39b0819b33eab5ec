use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{COLLECTIONS_DIR_NAME, CONFIG_DIR_NAME, WORKSPACE_ENVELOPE_NAME};
use crate::envelope::{export_file_name, export_workspace, import_collection, to_json};
use crate::models::{Envelope, Node};

/// Text file access the collection core needs from its host
pub trait TextFiles {
    /// Read a whole file as UTF-8 text
    fn read_file_as_text(&self, path: &Path) -> Result<String>;

    /// Write `text` to a file called `name`, returning where it landed
    fn write_file_text(&self, name: &str, text: &str) -> Result<PathBuf>;
}

/// Directory-backed collection storage
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Storage in the default workspace, `~/.freeman/collections`
    pub fn new() -> Self {
        let dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join(COLLECTIONS_DIR_NAME);
        Storage { dir }
    }

    /// Storage rooted at an explicit directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Storage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensure the storage directory exists
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("creating {}", self.dir.display()))?;
        }
        Ok(())
    }

    /// Load the workspace forest.
    ///
    /// Once `workspace-collections.json` exists it is the only file read, and
    /// a broken workspace file is an error rather than an empty workspace.
    /// Before the first save every envelope in the directory is loaded and
    /// flattened, so loose exports are adopted into the workspace once.
    pub fn load_collections(&self) -> Result<Vec<Node>> {
        let workspace = self.workspace_file();
        if workspace.is_file() {
            let text = self.read_file_as_text(&workspace)?;
            let forest = import_collection(&text)
                .with_context(|| format!("loading workspace {}", workspace.display()))?;
            tracing::debug!(path = %workspace.display(), collections = forest.len(), "Loaded workspace");
            return Ok(forest);
        }

        self.adopt_envelopes()
    }

    /// Every `*.json` envelope in the directory, sorted by file name.
    ///
    /// Files that cannot be read or are not valid envelopes are skipped.
    fn adopt_envelopes(&self) -> Result<Vec<Node>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut forest = Vec::new();
        for path in paths {
            let text = match self.read_file_as_text(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable collection file");
                    continue;
                }
            };
            match import_collection(&text) {
                Ok(items) => {
                    tracing::info!(path = %path.display(), collections = items.len(), "Adopted collection file");
                    forest.extend(items);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping invalid collection file");
                }
            }
        }

        Ok(forest)
    }

    /// Persist the whole forest as the workspace envelope
    pub fn save_collections(&self, forest: &[Node]) -> Result<PathBuf> {
        self.write_envelope(&export_workspace(forest))
    }

    /// Write an envelope under its derived file name
    pub fn write_envelope(&self, envelope: &Envelope) -> Result<PathBuf> {
        let text = to_json(envelope)?;
        self.write_file_text(&export_file_name(&envelope.name), &text)
    }

    /// Path of the persisted workspace envelope
    pub fn workspace_file(&self) -> PathBuf {
        self.dir.join(export_file_name(WORKSPACE_ENVELOPE_NAME))
    }
}

impl TextFiles for Storage {
    fn read_file_as_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn write_file_text(&self, name: &str, text: &str) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.dir.join(name);
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = text.len(), "Wrote collection file");
        Ok(path)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fixtures::sample_forest;
    use crate::app::CollectionState;
    use crate::envelope::export_one;

    #[test]
    fn test_save_and_load_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path().join("collections"));

        assert!(storage.load_collections().unwrap().is_empty());

        let path = storage.save_collections(&sample_forest()).unwrap();
        assert_eq!(path, storage.workspace_file());
        assert!(path.ends_with("workspace-collections.json"));

        assert_eq!(storage.load_collections().unwrap(), sample_forest());
    }

    #[test]
    fn test_load_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());

        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        fs::write(dir.path().join("other.json"), r#"{ "openapi": "3.0.0" }"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let envelope = export_one(&sample_forest(), "api").unwrap();
        storage.write_envelope(&envelope).unwrap();

        let forest = storage.load_collections().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id(), "api");
    }

    #[test]
    fn test_export_file_lands_under_slug() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());
        let envelope = export_one(&sample_forest(), "api").unwrap();

        let path = storage.write_envelope(&envelope).unwrap();
        assert_eq!(path, dir.path().join("api.json"));

        let text = storage.read_file_as_text(&path).unwrap();
        assert!(text.contains("\"exportDate\""));
        assert!(text.starts_with("{\n  \"version\": \"1.0\""));
    }

    #[test]
    fn test_repeated_sessions_do_not_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());
        let envelope = export_one(&sample_forest(), "api").unwrap();
        storage.write_envelope(&envelope).unwrap();

        let mut counts = Vec::new();
        for _ in 0..3 {
            let mut state = CollectionState::new();
            state.merge(storage.load_collections().unwrap());
            counts.push(state.len());

            let root = state.nodes()[0].id().to_string();
            state.toggle_expand(&root).unwrap();
            storage.save_collections(state.nodes()).unwrap();
        }
        assert_eq!(counts, vec![1, 1, 1]);

        // Exports written after the first save are not pulled back in
        storage.write_envelope(&envelope).unwrap();
        let forest = storage.load_collections().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id(), "api");
        assert!(!matches!(&forest[0], Node::Folder(folder) if folder.expanded));
    }

    #[test]
    fn test_broken_workspace_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path());
        fs::write(storage.workspace_file(), "{ nope").unwrap();
        storage.write_envelope(&export_one(&sample_forest(), "api").unwrap()).unwrap();

        assert!(storage.load_collections().is_err());
    }
}
