//! Entry repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use glossa_core::{Entry, EntryRepository, Error, Result, WriteEntryRequest};

use crate::escape_like;

/// PostgreSQL implementation of EntryRepository.
#[derive(Clone)]
pub struct PgEntryRepository {
    pool: Pool<Postgres>,
}

impl PgEntryRepository {
    /// Create a new PgEntryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn entry_from_row(r: PgRow) -> Entry {
    Entry {
        id: r.get("id"),
        keyword: r.get("keyword"),
        description: r.get("description"),
        author_id: r.get("author_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn insert(&self, req: &WriteEntryRequest) -> Result<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO entry (author_id, keyword, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            "#,
        )
        .bind(req.author_id)
        .bind(&req.keyword)
        .bind(&req.description)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Error::DuplicateKeyword(req.keyword.clone())
            }
            other => Error::Database(other),
        })?;

        Ok(())
    }

    async fn update(&self, req: &WriteEntryRequest) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE entry SET author_id = $1, description = $2, updated_at = $3 WHERE keyword = $4",
        )
        .bind(req.author_id)
        .bind(&req.description)
        .bind(Utc::now())
        .bind(&req.keyword)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, keyword: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entry WHERE keyword = $1")
            .bind(keyword)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, keyword: &str) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, keyword, description, author_id, created_at, updated_at
            FROM entry
            WHERE keyword = $1
            "#,
        )
        .bind(keyword)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(entry_from_row))
    }

    async fn exists(&self, keyword: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM entry WHERE keyword = $1)")
                .bind(keyword)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;

        Ok(exists)
    }

    async fn keywords_mentioning(&self, needle: &str) -> Result<Vec<String>> {
        let keywords: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT keyword
            FROM entry
            WHERE description LIKE '%' || $1 || '%' ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(escape_like(needle))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(keywords)
    }

    async fn all_keywords(&self) -> Result<Vec<String>> {
        let keywords: Vec<String> = sqlx::query_scalar(
            "SELECT keyword FROM entry ORDER BY CHARACTER_LENGTH(keyword) DESC, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(keywords)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, keyword, description, author_id, created_at, updated_at
            FROM entry
            ORDER BY updated_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    async fn list_all(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, keyword, description, author_id, created_at, updated_at
            FROM entry
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entry")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(count)
    }

    async fn delete_beyond(&self, seed_boundary: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM entry WHERE id > $1")
            .bind(seed_boundary)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }
}
