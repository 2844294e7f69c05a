use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::debug;

use super::KeyValueStorage;

/// Storage file name in the data directory
const STORAGE_FILE: &str = "storage.json";

/// Key-value storage backed by a single JSON object file.
///
/// Every mutation rewrites the whole file. A missing file reads as empty.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Storage at `<dir>/storage.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::at_path(dir.as_ref().join(STORAGE_FILE))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage file {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse storage file {}", self.path.display()))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write storage file {}", self.path.display()))?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_all()?;
        if f(&mut entries) {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!(key, path = %self.path.display(), "Writing storage key");
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| entries.remove(key).is_some())
    }
}
