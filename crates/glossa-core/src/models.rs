//! Core data models for glossa.
//!
//! These types are shared across all glossa crates and represent
//! the core domain entities.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ENTRY TYPES
// =============================================================================

/// A stored keyword and its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub keyword: String,
    pub description: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or overwriting an entry.
#[derive(Debug, Clone)]
pub struct WriteEntryRequest {
    pub keyword: String,
    pub description: String,
    pub author_id: i64,
}

/// Result of an upsert.
///
/// `affected` lists every keyword whose rendered HTML may have changed and
/// must be dropped from the render cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    pub keyword: String,
    pub inserted: bool,
    pub affected: BTreeSet<String>,
}

// =============================================================================
// STAR TYPES
// =============================================================================

/// A single endorsement of a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub keyword: String,
    pub user_name: String,
}

// =============================================================================
// USER TYPES
// =============================================================================

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing)]
    pub salt: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for registering a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub salt: String,
    pub password_hash: String,
}
