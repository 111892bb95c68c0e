//! # glossa-db
//!
//! PostgreSQL database layer for glossa.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for entries, stars and users
//!
//! ## Example
//!
//! ```rust,ignore
//! use glossa_db::{Database, EntryRepository, PoolConfig, WriteEntryRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/glossa", &PoolConfig::default()).await?;
//!
//!     db.entries.insert(&WriteEntryRequest {
//!         keyword: "cat".to_string(),
//!         description: "A small domesticated carnivore".to_string(),
//!         author_id: 1,
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
pub mod entries;
pub mod pool;
pub mod stars;
pub mod users;

// Integration tests in tests/ use DEFAULT_TEST_DATABASE_URL, so this is always compiled.
pub mod test_fixtures;

// Re-export core types
pub use glossa_core::*;

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use entries::PgEntryRepository;
pub use pool::{create_pool, PoolConfig};
pub use stars::PgStarRepository;
pub use users::PgUserRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Keyword entries.
    pub entries: PgEntryRepository,
    /// Star log.
    pub stars: PgStarRepository,
    /// Registered users.
    pub users: PgUserRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            entries: PgEntryRepository::new(pool.clone()),
            stars: PgStarRepository::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open a pool and build the repositories on it.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = create_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("cat"), "cat");
    }
}
