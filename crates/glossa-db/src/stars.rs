//! Star repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use glossa_core::{Error, Result, StarRepository};

/// PostgreSQL implementation of StarRepository.
#[derive(Clone)]
pub struct PgStarRepository {
    pool: Pool<Postgres>,
}

impl PgStarRepository {
    /// Create a new PgStarRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StarRepository for PgStarRepository {
    async fn append(&self, keyword: &str, user_name: &str) -> Result<()> {
        sqlx::query("INSERT INTO star (keyword, user_name, created_at) VALUES ($1, $2, $3)")
            .bind(keyword)
            .bind(user_name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(())
    }

    async fn truncate(&self) -> Result<()> {
        sqlx::query("TRUNCATE star")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(())
    }
}
