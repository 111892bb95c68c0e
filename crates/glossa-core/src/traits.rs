//! Core traits for glossa abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// ENTRY REPOSITORY
// =============================================================================

/// Repository for keyword entries.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Insert a new entry.
    ///
    /// Fails with [`Error::DuplicateKeyword`](crate::Error::DuplicateKeyword)
    /// when the keyword already exists.
    async fn insert(&self, req: &WriteEntryRequest) -> Result<()>;

    /// Overwrite description, author and `updated_at` of an existing entry.
    /// Returns false if no entry has this keyword.
    async fn update(&self, req: &WriteEntryRequest) -> Result<bool>;

    /// Delete an entry. Returns false if no entry has this keyword.
    async fn delete(&self, keyword: &str) -> Result<bool>;

    /// Fetch an entry by keyword.
    async fn get(&self, keyword: &str) -> Result<Option<Entry>>;

    /// Check if an entry exists.
    async fn exists(&self, keyword: &str) -> Result<bool>;

    /// Keywords of every entry whose description contains `needle`.
    async fn keywords_mentioning(&self, needle: &str) -> Result<Vec<String>>;

    /// All keywords, longest first, ties in store order.
    async fn all_keywords(&self) -> Result<Vec<String>>;

    /// Entries ordered by `updated_at` descending.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Entry>>;

    /// Every entry, in store order.
    async fn list_all(&self) -> Result<Vec<Entry>>;

    /// Total number of entries.
    async fn count(&self) -> Result<i64>;

    /// Delete every entry whose id is above `seed_boundary`.
    async fn delete_beyond(&self, seed_boundary: i64) -> Result<u64>;
}

// =============================================================================
// STAR REPOSITORY
// =============================================================================

/// Append-only star log. Reads are served from the cached list views.
#[async_trait]
pub trait StarRepository: Send + Sync {
    /// Record a star.
    async fn append(&self, keyword: &str, user_name: &str) -> Result<()>;

    /// Remove every star.
    async fn truncate(&self) -> Result<()>;
}

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for registered users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user. Fails with `DuplicateUser` if the name is taken.
    async fn create(&self, req: CreateUserRequest) -> Result<i64>;

    /// Find a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Find a user by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>>;
}

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Key-value cache store contract.
///
/// Values and list items are strings. A missing list reads as empty.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Append to the tail of a list.
    async fn list_push(&self, key: &str, value: &str) -> Result<()>;

    /// Whole list, head to tail.
    async fn list_range(&self, key: &str) -> Result<Vec<String>>;

    /// Remove every key owned by this service.
    async fn flush_all(&self) -> Result<()>;
}

/// Remote spam classifier.
#[async_trait]
pub trait SpamChecker: Send + Sync {
    /// Returns true if the content is acceptable.
    async fn is_valid(&self, content: &str) -> Result<bool>;
}
