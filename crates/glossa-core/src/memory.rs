//! In-memory implementations of the repository and collaborator traits.
//!
//! Used by unit and router tests so the services can run without PostgreSQL,
//! Redis or the spam service. Each store sits behind a `std::sync::Mutex`, so
//! the insert-if-absent check in [`MemoryEntryRepository::insert`] is atomic
//! the same way the UNIQUE constraint is in PostgreSQL.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::*;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// ENTRIES
// =============================================================================

#[derive(Default)]
struct EntryTable {
    next_id: i64,
    rows: Vec<Entry>,
}

/// In-memory entry table with a unique keyword constraint.
#[derive(Default)]
pub struct MemoryEntryRepository {
    table: Mutex<EntryTable>,
}

impl MemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryRepository for MemoryEntryRepository {
    async fn insert(&self, req: &WriteEntryRequest) -> Result<()> {
        let mut table = lock(&self.table);
        if table.rows.iter().any(|e| e.keyword == req.keyword) {
            return Err(Error::DuplicateKeyword(req.keyword.clone()));
        }
        table.next_id += 1;
        let now = Utc::now();
        let entry = Entry {
            id: table.next_id,
            keyword: req.keyword.clone(),
            description: req.description.clone(),
            author_id: req.author_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(entry);
        Ok(())
    }

    async fn update(&self, req: &WriteEntryRequest) -> Result<bool> {
        let mut table = lock(&self.table);
        match table.rows.iter_mut().find(|e| e.keyword == req.keyword) {
            Some(entry) => {
                entry.description = req.description.clone();
                entry.author_id = req.author_id;
                entry.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, keyword: &str) -> Result<bool> {
        let mut table = lock(&self.table);
        let before = table.rows.len();
        table.rows.retain(|e| e.keyword != keyword);
        Ok(table.rows.len() != before)
    }

    async fn get(&self, keyword: &str) -> Result<Option<Entry>> {
        Ok(lock(&self.table)
            .rows
            .iter()
            .find(|e| e.keyword == keyword)
            .cloned())
    }

    async fn exists(&self, keyword: &str) -> Result<bool> {
        Ok(lock(&self.table).rows.iter().any(|e| e.keyword == keyword))
    }

    async fn keywords_mentioning(&self, needle: &str) -> Result<Vec<String>> {
        Ok(lock(&self.table)
            .rows
            .iter()
            .filter(|e| e.description.contains(needle))
            .map(|e| e.keyword.clone())
            .collect())
    }

    async fn all_keywords(&self) -> Result<Vec<String>> {
        let mut keywords: Vec<String> = lock(&self.table)
            .rows
            .iter()
            .map(|e| e.keyword.clone())
            .collect();
        keywords.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));
        Ok(keywords)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Entry>> {
        let mut rows = lock(&self.table).rows.clone();
        rows.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Entry>> {
        Ok(lock(&self.table).rows.clone())
    }

    async fn count(&self) -> Result<i64> {
        Ok(lock(&self.table).rows.len() as i64)
    }

    async fn delete_beyond(&self, seed_boundary: i64) -> Result<u64> {
        let mut table = lock(&self.table);
        let before = table.rows.len();
        table.rows.retain(|e| e.id <= seed_boundary);
        Ok((before - table.rows.len()) as u64)
    }
}

// =============================================================================
// STARS
// =============================================================================

/// In-memory star log.
#[derive(Default)]
pub struct MemoryStarRepository {
    stars: Mutex<Vec<Star>>,
}

impl MemoryStarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stars logged.
    pub fn len(&self) -> usize {
        lock(&self.stars).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.stars).is_empty()
    }
}

#[async_trait]
impl StarRepository for MemoryStarRepository {
    async fn append(&self, keyword: &str, user_name: &str) -> Result<()> {
        lock(&self.stars).push(Star {
            keyword: keyword.to_string(),
            user_name: user_name.to_string(),
        });
        Ok(())
    }

    async fn truncate(&self) -> Result<()> {
        lock(&self.stars).clear();
        Ok(())
    }
}

// =============================================================================
// USERS
// =============================================================================

/// In-memory user table with a unique name constraint.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, req: CreateUserRequest) -> Result<i64> {
        let mut users = lock(&self.users);
        if users.iter().any(|u| u.name == req.name) {
            return Err(Error::DuplicateUser(req.name));
        }
        let id = users.len() as i64 + 1;
        users.push(User {
            id,
            name: req.name,
            salt: req.salt,
            password_hash: req.password_hash,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(lock(&self.users).iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(lock(&self.users).iter().find(|u| u.name == name).cloned())
    }
}

// =============================================================================
// CACHE STORE
// =============================================================================

/// In-memory key-value store with string lists.
#[derive(Default)]
pub struct MemoryKvStore {
    values: Mutex<HashMap<String, String>>,
    lists: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of plain keys currently stored.
    pub fn len(&self) -> usize {
        lock(&self.values).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.values).get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        lock(&self.values).remove(key);
        lock(&self.lists).remove(key);
        Ok(())
    }

    async fn list_push(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.lists)
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn list_range(&self, key: &str) -> Result<Vec<String>> {
        Ok(lock(&self.lists).get(key).cloned().unwrap_or_default())
    }

    async fn flush_all(&self) -> Result<()> {
        lock(&self.values).clear();
        lock(&self.lists).clear();
        Ok(())
    }
}

// =============================================================================
// SPAM CHECK
// =============================================================================

/// Spam checker that rejects content containing any configured word.
#[derive(Default)]
pub struct StaticSpamChecker {
    banned: Vec<String>,
    unavailable: bool,
    calls: Mutex<Vec<String>>,
}

impl StaticSpamChecker {
    /// Accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects content containing any of `words`.
    pub fn rejecting<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            banned: words.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Fails every call, as if the service timed out.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Every content string checked so far.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl SpamChecker for StaticSpamChecker {
    async fn is_valid(&self, content: &str) -> Result<bool> {
        lock(&self.calls).push(content.to_string());
        if self.unavailable {
            return Err(Error::Request("spam check timed out".to_string()));
        }
        Ok(!self.banned.iter().any(|w| content.contains(w.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(keyword: &str, description: &str) -> WriteEntryRequest {
        WriteEntryRequest {
            keyword: keyword.to_string(),
            description: description.to_string(),
            author_id: 1,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_keyword() {
        let repo = MemoryEntryRepository::new();
        repo.insert(&write("cat", "one")).await.unwrap();
        let err = repo.insert(&write("cat", "two")).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateKeyword(k) if k == "cat"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_keywords_mentioning_is_substring_scan() {
        let repo = MemoryEntryRepository::new();
        repo.insert(&write("dog", "I love cats")).await.unwrap();
        repo.insert(&write("owl", "hoot")).await.unwrap();
        assert_eq!(repo.keywords_mentioning("cat").await.unwrap(), vec!["dog"]);
    }

    #[tokio::test]
    async fn test_delete_beyond_keeps_seed_rows() {
        let repo = MemoryEntryRepository::new();
        for k in ["a", "b", "c"] {
            repo.insert(&write(k, "")).await.unwrap();
        }
        assert_eq!(repo.delete_beyond(1).await.unwrap(), 2);
        assert!(repo.exists("a").await.unwrap());
        assert!(!repo.exists("c").await.unwrap());
    }

    #[tokio::test]
    async fn test_kv_lists_keep_push_order() {
        let kv = MemoryKvStore::new();
        kv.list_push("l", "alice").await.unwrap();
        kv.list_push("l", "bob").await.unwrap();
        assert_eq!(kv.list_range("l").await.unwrap(), vec!["alice", "bob"]);
        assert!(kv.list_range("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_static_spam_checker() {
        let spam = StaticSpamChecker::rejecting(["viagra"]);
        assert!(spam.is_valid("hello").await.unwrap());
        assert!(!spam.is_valid("cheap viagra").await.unwrap());
        assert_eq!(spam.calls().len(), 2);
        assert!(StaticSpamChecker::unavailable().is_valid("x").await.is_err());
    }
}
