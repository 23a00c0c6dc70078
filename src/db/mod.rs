// src/db/mod.rs
//! Relational backend for the password store.
//!
//! Every public call builds a single-threaded runtime, opens one connection, makes
//! sure the table exists, runs its statement and closes the connection again.
//! No pool or connection outlives the call.

use std::future::Future;

use sqlx::Connection;

use crate::crypto::hash_password;
use crate::models::{PoolOptions, StoredEntry};
use crate::storage::{label_filter, new_entry, PasswordStore, Result, StorageError};
use crate::utils::{now_utc, redact_dsn};

pub mod postgres;
pub mod sqlite;

// Database backend trait - implemented once per SQL dialect
pub(crate) trait DatabaseBackend {
    // `entry.created_at` is the stored creation time
    async fn insert(&self, entry: &StoredEntry) -> Result<StoredEntry>;

    // `hash` and `label_query` are ANDed when both are present
    async fn select(
        &self,
        label_query: Option<&str>,
        hash: Option<&str>,
    ) -> Result<Vec<StoredEntry>>;

    async fn delete_one(&self, entry: &StoredEntry) -> Result<bool>;

    async fn delete_all(&self) -> Result<u64>;
}

#[derive(Debug, Clone)]
pub enum DatabaseType {
    Postgres(postgres::PostgresBackend),
    Sqlite(sqlite::SqliteBackend),
}

/// Entries kept in the `passgen_passwords` table of a PostgreSQL or SQLite database.
#[derive(Debug, Clone)]
pub struct RelationalStore {
    backend: DatabaseType,
    display_dsn: String,
}

impl RelationalStore {
    /// Pick a driver from the DSN scheme. Nothing is opened until the first operation.
    pub fn new(dsn: &str) -> Result<Self> {
        let backend = if dsn.starts_with("postgres://") || dsn.starts_with("postgresql://") {
            DatabaseType::Postgres(postgres::PostgresBackend::new(dsn))
        } else if dsn.starts_with("sqlite:") {
            DatabaseType::Sqlite(sqlite::SqliteBackend::new(dsn))
        } else {
            let scheme = dsn.split(':').next().unwrap_or(dsn);
            return Err(StorageError::DependencyUnavailable(format!(
                "no database driver for scheme '{}' (supported: postgres, sqlite)",
                scheme
            )));
        };

        let display_dsn = redact_dsn(dsn);
        log::debug!("Using relational store at {}", display_dsn);
        Ok(Self {
            backend,
            display_dsn,
        })
    }

    pub fn dialect_name(&self) -> &'static str {
        match &self.backend {
            DatabaseType::Postgres(_) => "postgresql",
            DatabaseType::Sqlite(_) => "sqlite",
        }
    }

    async fn insert(&self, entry: &StoredEntry) -> Result<StoredEntry> {
        match &self.backend {
            DatabaseType::Postgres(backend) => backend.insert(entry).await,
            DatabaseType::Sqlite(backend) => backend.insert(entry).await,
        }
    }

    async fn select(
        &self,
        label_query: Option<&str>,
        hash: Option<&str>,
    ) -> Result<Vec<StoredEntry>> {
        match &self.backend {
            DatabaseType::Postgres(backend) => backend.select(label_query, hash).await,
            DatabaseType::Sqlite(backend) => backend.select(label_query, hash).await,
        }
    }

    async fn delete_one(&self, entry: &StoredEntry) -> Result<bool> {
        match &self.backend {
            DatabaseType::Postgres(backend) => backend.delete_one(entry).await,
            DatabaseType::Sqlite(backend) => backend.delete_one(entry).await,
        }
    }

    async fn delete_all(&self) -> Result<u64> {
        match &self.backend {
            DatabaseType::Postgres(backend) => backend.delete_all().await,
            DatabaseType::Sqlite(backend) => backend.delete_all().await,
        }
    }
}

impl PasswordStore for RelationalStore {
    fn location(&self) -> String {
        self.display_dsn.clone()
    }

    fn store(
        &self,
        password: &str,
        label: &str,
        length: usize,
        options: PoolOptions,
    ) -> Result<StoredEntry> {
        let entry = new_entry(password, label, length, options, now_utc());
        let stored = block_on(self.insert(&entry))??;

        log::info!("Stored entry '{}' in {}", stored.label, self.display_dsn);
        Ok(stored)
    }

    fn search(&self, label_query: Option<&str>) -> Result<Vec<StoredEntry>> {
        block_on(self.select(label_filter(label_query), None))?
    }

    fn verify(&self, password: &str, label_query: Option<&str>) -> Result<Vec<StoredEntry>> {
        let target = hash_password(password);
        block_on(self.select(label_filter(label_query), Some(target.as_str())))?
    }

    fn delete(&self, entry: &StoredEntry) -> Result<bool> {
        let deleted = block_on(self.delete_one(entry))??;
        if deleted {
            log::info!("Deleted entry '{}' from {}", entry.label, self.display_dsn);
        }
        Ok(deleted)
    }

    fn clear(&self) -> Result<usize> {
        let removed = block_on(self.delete_all())??;
        log::info!("Cleared {} entries from {}", removed, self.display_dsn);
        Ok(removed as usize)
    }
}

// Run one operation to completion on a fresh current-thread runtime
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            StorageError::DependencyUnavailable(format!("cannot start async runtime: {}", e))
        })?;
    Ok(runtime.block_on(future))
}

pub(crate) fn connect_error(error: sqlx::Error) -> StorageError {
    StorageError::Connection(error.to_string())
}

// Transport failures mid-call are still connection problems; everything else is the query
pub(crate) fn query_error(error: sqlx::Error) -> StorageError {
    match &error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StorageError::Connection(error.to_string()),
        _ => StorageError::Schema(error.to_string()),
    }
}

pub(crate) async fn release<C: Connection>(conn: C) {
    if let Err(e) = conn.close().await {
        log::warn!("Failed to close database connection: {}", e);
    }
}

/// `%query%` with `%`, `_` and `\` escaped, for use with `ESCAPE '\'`.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn length_column<T: TryFrom<usize>>(length: usize) -> Result<T> {
    T::try_from(length)
        .map_err(|_| StorageError::Schema(format!("length {} does not fit the length column", length)))
}

// Negative lengths can only come from rows written outside this crate
pub(crate) fn stored_length<T: Copy + std::fmt::Display>(length: T) -> Result<usize>
where
    usize: TryFrom<T>,
{
    usize::try_from(length)
        .map_err(|_| StorageError::Schema(format!("invalid length column value {}", length)))
}
