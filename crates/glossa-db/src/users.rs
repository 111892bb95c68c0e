//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use glossa_core::{CreateUserRequest, Error, Result, User, UserRepository};

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn user_from_row(r: PgRow) -> User {
    User {
        id: r.get("id"),
        name: r.get("name"),
        salt: r.get("salt"),
        password_hash: r.get("password"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, req: CreateUserRequest) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, salt, password, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&req.name)
        .bind(&req.salt)
        .bind(&req.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Error::DuplicateUser(req.name.clone())
            }
            other => Error::Database(other),
        })?;

        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, salt, password, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(user_from_row))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        let row =
            sqlx::query("SELECT id, name, salt, password, created_at FROM users WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::Database)?;

        Ok(row.map(user_from_row))
    }
}
