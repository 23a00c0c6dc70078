// src/storage/mod.rs
//! Persistence of generated-password records.
//!
//! Two interchangeable backends implement [`PasswordStore`]: a JSON file on disk and a
//! relational table. Each call opens what it needs, does its work and releases it before
//! returning; nothing is cached between calls, so concurrent writers against the same
//! file race and the last one wins.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::crypto::hash_password;
use crate::db::RelationalStore;
use crate::models::{PoolOptions, StoredEntry};
use crate::utils::format_timestamp;

pub mod file;

pub use file::FileStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage file {} is corrupted: {reason}", .path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Cannot access storage file {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Cannot serialize entries: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Database driver unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Cannot connect to database: {0}")]
    Connection(String),

    #[error("Database schema or query failed: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Uniform operations over persisted entries.
///
/// `search` and `verify` return entries in insertion order. An empty result is `Ok(vec![])`.
pub trait PasswordStore {
    /// Where entries live: an absolute file path or a redacted DSN.
    fn location(&self) -> String;

    /// Hash `password` and append a new entry. Returns a copy of what was written.
    fn store(
        &self,
        password: &str,
        label: &str,
        length: usize,
        options: PoolOptions,
    ) -> Result<StoredEntry>;

    /// Entries whose label contains `label_query`, ignoring case. `None` or `""` returns all.
    fn search(&self, label_query: Option<&str>) -> Result<Vec<StoredEntry>>;

    /// The subset of `search(label_query)` whose hash equals the hash of `password`.
    fn verify(&self, password: &str, label_query: Option<&str>) -> Result<Vec<StoredEntry>>;

    /// Remove the first entry with the same label, hash and creation time.
    fn delete(&self, entry: &StoredEntry) -> Result<bool>;

    /// Remove every entry, returning how many were removed.
    fn clear(&self) -> Result<usize>;
}

/// The backend chosen for one invocation.
pub enum Backend {
    File(FileStore),
    Relational(RelationalStore),
}

impl Backend {
    /// A connection string selects the relational store; otherwise the file store at
    /// `storage_file` is used. There is no fallback from one to the other.
    pub fn select(dsn: Option<&str>, storage_file: &Path) -> Result<Self> {
        match dsn.map(str::trim).filter(|dsn| !dsn.is_empty()) {
            Some(dsn) => Ok(Backend::Relational(RelationalStore::new(dsn)?)),
            None => Ok(Backend::File(FileStore::new(storage_file)?)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Backend::File(_) => "file",
            Backend::Relational(store) => store.dialect_name(),
        }
    }
}

impl PasswordStore for Backend {
    fn location(&self) -> String {
        match self {
            Backend::File(store) => store.location(),
            Backend::Relational(store) => store.location(),
        }
    }

    fn store(
        &self,
        password: &str,
        label: &str,
        length: usize,
        options: PoolOptions,
    ) -> Result<StoredEntry> {
        match self {
            Backend::File(store) => store.store(password, label, length, options),
            Backend::Relational(store) => store.store(password, label, length, options),
        }
    }

    fn search(&self, label_query: Option<&str>) -> Result<Vec<StoredEntry>> {
        match self {
            Backend::File(store) => store.search(label_query),
            Backend::Relational(store) => store.search(label_query),
        }
    }

    fn verify(&self, password: &str, label_query: Option<&str>) -> Result<Vec<StoredEntry>> {
        match self {
            Backend::File(store) => store.verify(password, label_query),
            Backend::Relational(store) => store.verify(password, label_query),
        }
    }

    fn delete(&self, entry: &StoredEntry) -> Result<bool> {
        match self {
            Backend::File(store) => store.delete(entry),
            Backend::Relational(store) => store.delete(entry),
        }
    }

    fn clear(&self) -> Result<usize> {
        match self {
            Backend::File(store) => store.clear(),
            Backend::Relational(store) => store.clear(),
        }
    }
}

// Build the record written by `store`; plaintext goes no further than this
pub(crate) fn new_entry(
    password: &str,
    label: &str,
    length: usize,
    options: PoolOptions,
    created_at: DateTime<Utc>,
) -> StoredEntry {
    StoredEntry {
        label: label.to_string(),
        hash: hash_password(password),
        length,
        options,
        created_at: format_timestamp(created_at),
    }
}

// Empty queries mean "no filter"
pub(crate) fn label_filter(label_query: Option<&str>) -> Option<&str> {
    label_query.filter(|query| !query.is_empty())
}

pub(crate) fn label_matches(label: &str, query: &str) -> bool {
    label.to_lowercase().contains(&query.to_lowercase())
}
