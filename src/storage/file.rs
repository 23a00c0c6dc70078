// src/storage/file.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{label_filter, label_matches, new_entry, PasswordStore, Result, StorageError};
use crate::crypto::hash_password;
use crate::models::{PoolOptions, StoredEntry};
use crate::utils::{absolutize, now_utc, write_atomic};

/// Entries kept as a pretty-printed JSON array in a single file.
///
/// A missing file reads as an empty store. Every write rewrites the whole file through
/// a temporary sibling and a rename. There is no locking between processes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: &Path) -> Result<Self> {
        let path = absolutize(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_entries(&self) -> Result<Vec<StoredEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;
        if !value.is_array() {
            return Err(self.corrupt("expected a list of entries".to_string()));
        }
        serde_json::from_value(value).map_err(|e| self.corrupt(e.to_string()))
    }

    fn write_entries(&self, entries: &[StoredEntry]) -> Result<()> {
        let json = serde_json::to_vec_pretty(entries)?;
        write_atomic(&self.path, &json).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn corrupt(&self, reason: String) -> StorageError {
        StorageError::CorruptStore {
            path: self.path.clone(),
            reason,
        }
    }
}

impl PasswordStore for FileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn store(
        &self,
        password: &str,
        label: &str,
        length: usize,
        options: PoolOptions,
    ) -> Result<StoredEntry> {
        let mut entries = self.load_entries()?;
        let entry = new_entry(password, label, length, options, now_utc());
        entries.push(entry.clone());
        self.write_entries(&entries)?;

        log::info!("Stored entry '{}' in {}", entry.label, self.path.display());
        Ok(entry)
    }

    fn search(&self, label_query: Option<&str>) -> Result<Vec<StoredEntry>> {
        let entries = self.load_entries()?;
        log::debug!("Loaded {} entries from {}", entries.len(), self.path.display());

        Ok(match label_filter(label_query) {
            Some(query) => entries
                .into_iter()
                .filter(|entry| label_matches(&entry.label, query))
                .collect(),
            None => entries,
        })
    }

    fn verify(&self, password: &str, label_query: Option<&str>) -> Result<Vec<StoredEntry>> {
        let target = hash_password(password);
        let mut entries = self.search(label_query)?;
        entries.retain(|entry| entry.hash == target);
        Ok(entries)
    }

    fn delete(&self, entry: &StoredEntry) -> Result<bool> {
        let mut entries = self.load_entries()?;
        let Some(index) = entries.iter().position(|e| e.same_identity(entry)) else {
            return Ok(false);
        };
        entries.remove(index);
        self.write_entries(&entries)?;

        log::info!("Deleted entry '{}' from {}", entry.label, self.path.display());
        Ok(true)
    }

    fn clear(&self) -> Result<usize> {
        let entries = self.load_entries()?;
        if entries.is_empty() {
            return Ok(0);
        }
        self.write_entries(&[])?;

        log::info!("Cleared {} entries from {}", entries.len(), self.path.display());
        Ok(entries.len())
    }
}
