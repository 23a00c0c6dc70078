// src/db/postgres.rs
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Connection, PgConnection, Row};

use super::{
    connect_error, length_column, like_pattern, query_error, release, stored_length,
    DatabaseBackend,
};
use crate::models::{PoolOptions, StoredEntry};
use crate::storage::{Result, StorageError};
use crate::utils::format_timestamp;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS passgen_passwords (
        id SERIAL PRIMARY KEY,
        label TEXT,
        hash TEXT NOT NULL,
        length INTEGER NOT NULL,
        options JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
"#;

const COLUMNS: &str = "label, hash, length, options, created_at";

#[derive(Debug, Clone)]
pub struct PostgresBackend {
    dsn: String,
}

impl PostgresBackend {
    pub fn new(dsn: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
        }
    }

    // Open a connection and make sure the table exists before handing it out
    async fn connect(&self) -> Result<PgConnection> {
        let mut conn = PgConnection::connect(&self.dsn)
            .await
            .map_err(connect_error)?;

        if let Err(e) = sqlx::query(CREATE_TABLE).execute(&mut conn).await {
            release(conn).await;
            return Err(query_error(e));
        }
        Ok(conn)
    }

    async fn insert_on(conn: &mut PgConnection, entry: &StoredEntry) -> Result<StoredEntry> {
        let length: i32 = length_column(entry.length)?;
        let created_at = DateTime::parse_from_rfc3339(&entry.created_at)
            .map_err(|e| {
                StorageError::Schema(format!("invalid created_at '{}': {}", entry.created_at, e))
            })?
            .with_timezone(&Utc);
        let sql = format!(
            r#"
            INSERT INTO passgen_passwords ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(&entry.label)
            .bind(&entry.hash)
            .bind(length)
            .bind(Json(entry.options))
            .bind(created_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(query_error)?;

        entry_from_row(&row)
    }

    async fn select_on(
        conn: &mut PgConnection,
        label_query: Option<&str>,
        hash: Option<&str>,
    ) -> Result<Vec<StoredEntry>> {
        let mut sql = format!("SELECT {COLUMNS} FROM passgen_passwords");
        let mut conditions = Vec::new();
        let mut param_idx = 1;

        if hash.is_some() {
            conditions.push(format!("hash = ${}", param_idx));
            param_idx += 1;
        }
        if label_query.is_some() {
            conditions.push(format!(r"label ILIKE ${} ESCAPE '\'", param_idx));
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY id ASC");

        let mut query = sqlx::query(&sql);
        if let Some(hash) = hash {
            query = query.bind(hash);
        }
        if let Some(label_query) = label_query {
            query = query.bind(like_pattern(label_query));
        }

        let rows = query.fetch_all(&mut *conn).await.map_err(query_error)?;
        rows.iter().map(entry_from_row).collect()
    }

    async fn delete_one_on(conn: &mut PgConnection, entry: &StoredEntry) -> Result<bool> {
        // an unparseable timestamp cannot match any stored row
        let Ok(created_at) = DateTime::parse_from_rfc3339(&entry.created_at) else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            DELETE FROM passgen_passwords
            WHERE id = (
                SELECT id FROM passgen_passwords
                WHERE label = $1 AND hash = $2 AND created_at = $3
                ORDER BY id ASC
                LIMIT 1
            )
            "#,
        )
        .bind(&entry.label)
        .bind(&entry.hash)
        .bind(created_at.with_timezone(&Utc))
        .execute(&mut *conn)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}

impl DatabaseBackend for PostgresBackend {
    async fn insert(&self, entry: &StoredEntry) -> Result<StoredEntry> {
        let mut conn = self.connect().await?;
        let result = Self::insert_on(&mut conn, entry).await;
        release(conn).await;
        result
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

fn entry_from_row(row: &PgRow) -> Result<StoredEntry> {
    let label: Option<String> = row.try_get("label").map_err(query_error)?;
    let length: i32 = row.try_get("length").map_err(query_error)?;
    let Json(options): Json<PoolOptions> = row.try_get("options").map_err(query_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(query_error)?;

    Ok(StoredEntry {
        label: label.unwrap_or_default(),
        hash: row.try_get("hash").map_err(query_error)?,
        length: stored_length(length)?,
        options,
        created_at: format_timestamp(created_at),
    })
}
