use crate::models::ShortLink;
use crate::storage::{LinkStore, StoreError, StoreResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteStore {
    pool: Arc<SqlitePool>,
}

impl SqliteStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

/// Maps a sqlx error to the unique index it violated, if any.
fn classify_unique_violation(e: &sqlx::Error) -> Option<StoreError> {
    let db_err = e.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }

    // SQLite reports "UNIQUE constraint failed: links.code" (or links.url).
    let message = db_err.message();
    if message.contains("links.code") {
        Some(StoreError::CodeExists)
    } else if message.contains("links.url") {
        Some(StoreError::UrlExists)
    } else {
        None
    }
}

#[async_trait]
impl LinkStore for SqliteStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                url TEXT NOT NULL UNIQUE,
                visit_count INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn insert(&self, code: &str, url: &str) -> StoreResult<ShortLink> {
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| StoreError::Other(e.into()))?
            .as_secs() as i64;

        sqlx::query(
            r#"
            INSERT INTO links (code, url, visit_count, created_at)
            VALUES (?, ?, 0, ?)
            "#,
        )
        .bind(code)
        .bind(url)
        .bind(created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| classify_unique_violation(&e).unwrap_or_else(|| StoreError::Other(e.into())))?;

        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, code, url, visit_count, created_at
            FROM links
            WHERE code = ?
            "#,
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| StoreError::Other(e.into()))?;

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, code, url, visit_count, created_at
            FROM links
            WHERE code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortLink>> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, code, url, visit_count, created_at
            FROM links
            WHERE url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn increment_visits(&self, code: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE links
            SET visit_count = visit_count + 1
            WHERE code = ?
            "#,
        )
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
