use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::{PersistedState, StateStorage};

/// Keeps the snapshot as a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the configured `{data_path}/{key}.json`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.snapshot_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<PersistedState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let state: PersistedState = serde_json::from_str(&contents)?;
        Ok(Some(state))
    }

    /// Write to a temp file in the same directory, then rename over the target.
    fn save(&self, state: &PersistedState) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(state)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, NewBook};
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_snapshot() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("data").join("edulearn-storage.json"));

        let book = Book::new(NewBook::new("Test Book", "Author", "1 MB"));
        let state = PersistedState {
            books: vec![book.clone()],
            current_book: Some(book.clone()),
        };
        storage.save(&state).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.books[0].id, book.id);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("snap.json"));

        let first = PersistedState {
            books: vec![Book::new(NewBook::default()), Book::new(NewBook::default())],
            current_book: None,
        };
        storage.save(&first).unwrap();
        storage.save(&PersistedState::default()).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert!(loaded.books.is_empty());
        assert!(loaded.current_book.is_none());
    }

    #[test]
    fn test_snapshot_layout_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snap.json");
        let storage = JsonFileStorage::new(&path);
        storage.save(&PersistedState::default()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["books"], serde_json::json!([]));
        assert!(raw["currentBook"].is_null());
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("missing.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snap.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStorage::new(&path).load().is_err());
    }

    #[test]
    fn test_from_config_uses_key() {
        let mut config = AppConfig::default();
        config.set_data_path(PathBuf::from("/var/lib/funlearn"));
        let storage = JsonFileStorage::from_config(&config);
        assert!(storage.path().ends_with("edulearn-storage.json"));
    }
}
