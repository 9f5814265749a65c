use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::errors::StorageError;

use super::types::{FileStore, KeyValueStore};

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::info!("Using file session store at {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries to rewrite. A file that is not a JSON object is replaced;
    /// a file that cannot be read is left alone and the error returned.
    fn read_entries_for_update(&self) -> Result<HashMap<String, String>, StorageError> {
        match self.read_entries() {
            Err(StorageError::Serde(e)) => {
                tracing::warn!("Discarding corrupt session file: {}", e);
                Ok(HashMap::new())
            }
            other => other,
        }
    }

    /// Replace the file contents through a sibling temporary file so readers
    /// only ever see the old or the new contents.
    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.put_all(vec![(key.to_string(), value)])
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.remove_all(&[key])
    }

    fn put_all(&mut self, new_entries: Vec<(String, String)>) -> Result<(), StorageError> {
        let mut entries = self.read_entries_for_update()?;
        entries.extend(new_entries);
        self.write_entries(&entries)
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.read_entries_for_update()?;
        let before = entries.len();
        entries.retain(|k, _| !keys.contains(&k.as_str()));

        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if entries.len() != before {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
