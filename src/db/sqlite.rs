// src/db/sqlite.rs
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Row};

use super::{connect_error, length_column, query_error, release, stored_length, DatabaseBackend};
use crate::models::{PoolOptions, StoredEntry};
use crate::storage::{label_matches, Result, StorageError};

// Same columns as the PostgreSQL table; options are JSON text and timestamps ISO text.
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS passgen_passwords (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT,
        hash TEXT NOT NULL,
        length INTEGER NOT NULL,
        options TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

/// SQLite dialect.
///
/// SQLite's `LIKE` only folds ASCII case, so the label filter runs on the fetched rows
/// with the same matcher as the file store. The hash filter stays in SQL.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    connection_string: String,
}

impl SqliteBackend {
    pub fn new(connection_string: &str) -> Self {
        Self {
            connection_string: connection_string.to_string(),
        }
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        let options = SqliteConnectOptions::from_str(&self.connection_string)
            .map_err(connect_error)?
            .create_if_missing(true);
        let mut conn = options.connect().await.map_err(connect_error)?;

        if let Err(e) = sqlx::query(CREATE_TABLE).execute(&mut conn).await {
            release(conn).await;
            return Err(query_error(e));
        }
        Ok(conn)
    }

    async fn insert_on(conn: &mut SqliteConnection, entry: &StoredEntry) -> Result<()> {
        let length: i64 = length_column(entry.length)?;
        let options = serde_json::to_string(&entry.options)?;

        sqlx::query(
            r#"
            INSERT INTO passgen_passwords (label, hash, length, options, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.label)
        .bind(&entry.hash)
        .bind(length)
        .bind(options)
        .bind(&entry.created_at)
        .execute(&mut *conn)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn select_on(
        conn: &mut SqliteConnection,
        label_query: Option<&str>,
        hash: Option<&str>,
    ) -> Result<Vec<StoredEntry>> {
        let mut sql =
            String::from("SELECT label, hash, length, options, created_at FROM passgen_passwords");
        if hash.is_some() {
            sql.push_str(" WHERE hash = ?");
        }
        sql.push_str(" ORDER BY id ASC");

        let mut query = sqlx::query(&sql);
        if let Some(hash) = hash {
            query = query.bind(hash);
        }

        let rows = query.fetch_all(&mut *conn).await.map_err(query_error)?;
        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let entry = entry_from_row(row)?;
            if label_query.map_or(true, |query| label_matches(&entry.label, query)) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    async fn delete_one_on(conn: &mut SqliteConnection, entry: &StoredEntry) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM passgen_passwords
            WHERE id = (
                SELECT id FROM passgen_passwords
                WHERE label = ? AND hash = ? AND created_at = ?
                ORDER BY id ASC
                LIMIT 1
            )
            "#,
        )
        .bind(&entry.label)
        .bind(&entry.hash)
        .bind(&entry.created_at)
        .execute(&mut *conn)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}

impl DatabaseBackend for SqliteBackend {
    async fn insert(&self, entry: &StoredEntry) -> Result<StoredEntry> {
        let mut conn = self.connect().await?;
        let result = Self::insert_on(&mut conn, entry).await;
        release(conn).await;
        result.map(|()| entry.clone())
    }

    async fn select(
        &self,
        label_query: Option<&str>,
        hash: Option<&str>,
    ) -> Result<Vec<StoredEntry>> {
        let mut conn = self.connect().await?;
        let result = Self::select_on(&mut conn, label_query, hash).await;
        release(conn).await;
        result
    }

    async fn delete_one(&self, entry: &StoredEntry) -> Result<bool> {
        let mut conn = self.connect().await?;
        let result = Self::delete_one_on(&mut conn, entry).await;
        release(conn).await;
        result
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("DELETE FROM passgen_passwords")
            .execute(&mut conn)
            .await
            .map(|done| done.rows_affected())
            .map_err(query_error);
        release(conn).await;
        result
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<StoredEntry> {
    let label: Option<String> = row.try_get("label").map_err(query_error)?;
    let length: i64 = row.try_get("length").map_err(query_error)?;
    let options: String = row.try_get("options").map_err(query_error)?;
    let options: PoolOptions = serde_json::from_str(&options)
        .map_err(|e| StorageError::Schema(format!("malformed options column: {}", e)))?;

    Ok(StoredEntry {
        label: label.unwrap_or_default(),
        hash: row.try_get("hash").map_err(query_error)?,
        length: stored_length(length)?,
        options,
        created_at: row.try_get("created_at").map_err(query_error)?,
    })
}
